use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key for a loaded catalog (e.g., `components`, `patterns`).
///
/// Mirrors `catalog.key` in the catalog document and is how the repository
/// resolves catalogs.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Declares a string-backed token enum.
///
/// Known variants serialize to their canonical spelling; anything else lands in
/// `Other` with the original text so exact-match filtering keeps working on
/// values the crate does not know about.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $token,)+
                    $name::Other(value) => value.as_str(),
                }
            }

            pub fn from_token(value: &str) -> Self {
                match value {
                    $($token => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Ok(Self::from_token(&value))
            }
        }
    };
}

token_enum! {
    /// Record sub-schema discriminant. Gates which facets apply to a record.
    RecordType {
        Official => "official",
        Community => "community",
    }
}

token_enum! {
    /// Lifecycle status of an officially owned record.
    Lifecycle {
        Stable => "Stable",
        Beta => "Beta",
        Experimental => "Experimental",
        Deprecated => "Deprecated",
    }
}

token_enum! {
    /// Health status of a community-owned record.
    Health {
        Healthy => "Healthy",
        Caution => "Caution",
        Critical => "Critical",
    }
}

token_enum! {
    /// Adoption level; ranked for `usage-desc` ordering.
    UsageLevel {
        High => "High",
        Growing => "Growing",
        Medium => "Medium",
        Low => "Low",
    }
}

impl UsageLevel {
    /// Ordinal used by `usage-desc`. Lookup ignores case so hand-authored
    /// tokens like `high` still rank; unknown levels rank 0.
    pub fn rank(&self) -> u8 {
        match self.as_str().to_ascii_lowercase().as_str() {
            "high" => 4,
            "growing" => 3,
            "medium" => 2,
            "low" => 1,
            _ => 0,
        }
    }
}

/// A filterable dimension of a catalog record.
///
/// `Other` names an arbitrary string attribute carried on the record; it only
/// applies to records that actually carry that attribute.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Facet {
    Type,
    Category,
    Owner,
    Lifecycle,
    Health,
    Usage,
    Endorsement,
    Other(String),
}

impl Facet {
    pub fn as_str(&self) -> &str {
        match self {
            Facet::Type => "type",
            Facet::Category => "category",
            Facet::Owner => "owner",
            Facet::Lifecycle => "lifecycle",
            Facet::Health => "health",
            Facet::Usage => "usage",
            Facet::Endorsement => "endorsement",
            Facet::Other(value) => value.as_str(),
        }
    }

    /// Parse a facet name. `status` is accepted for `lifecycle` since pattern
    /// and primitive catalogs label the same dimension that way.
    pub fn from_token(value: &str) -> Self {
        match value.trim() {
            "type" => Facet::Type,
            "category" => Facet::Category,
            "owner" => Facet::Owner,
            "lifecycle" | "status" => Facet::Lifecycle,
            "health" => Facet::Health,
            "usage" => Facet::Usage,
            "endorsement" | "endorsed" => Facet::Endorsement,
            other => Facet::Other(other.to_string()),
        }
    }
}

impl Serialize for Facet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Facet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_token(&value))
    }
}
