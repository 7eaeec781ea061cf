//! Asset vocabulary for the configured futures universe.
//!
//! The decision rule table covers a closed set of assets; anything else is
//! carried through as [`Asset::Other`] so it still flows through the guard
//! and hits the decision fallback instead of being rejected up front.

use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    Gold,
    Silver,
    Copper,
    NaturalGas,
    Other(String),
}

impl Asset {
    /// Parse a single asset name. Case-insensitive; underscores are accepted
    /// in place of spaces so file-stem style names round-trip.
    pub fn parse(input: &str) -> Asset {
        let canonical = input.trim().to_uppercase().replace('_', " ");
        match canonical.as_str() {
            "GOLD" => Asset::Gold,
            "SILVER" => Asset::Silver,
            "COPPER" => Asset::Copper,
            "NATURAL GAS" => Asset::NaturalGas,
            _ => Asset::Other(canonical),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Asset::Gold => "GOLD",
            Asset::Silver => "SILVER",
            Asset::Copper => "COPPER",
            Asset::NaturalGas => "NATURAL GAS",
            Asset::Other(name) => name,
        }
    }

    /// Filesystem-safe form of the name (spaces become underscores).
    pub fn file_stem(&self) -> String {
        self.name().replace(' ', "_")
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetListError {
    #[error("empty token in asset list")]
    EmptyToken,

    #[error("duplicate asset: {0}")]
    DuplicateAsset(String),
}

/// Parse a comma-separated asset list from configuration.
pub fn parse_assets(input: &str) -> Result<Vec<Asset>, AssetListError> {
    let mut assets = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(AssetListError::EmptyToken);
        }
        let asset = Asset::parse(trimmed);
        if !seen.insert(asset.name().to_string()) {
            return Err(AssetListError::DuplicateAsset(asset.name().to_string()));
        }
        assets.push(asset);
    }

    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_assets() {
        assert_eq!(Asset::parse("gold"), Asset::Gold);
        assert_eq!(Asset::parse(" SILVER "), Asset::Silver);
        assert_eq!(Asset::parse("Natural Gas"), Asset::NaturalGas);
        assert_eq!(Asset::parse("NATURAL_GAS"), Asset::NaturalGas);
    }

    #[test]
    fn unknown_asset_is_carried_through() {
        let asset = Asset::parse("platinum");
        assert_eq!(asset, Asset::Other("PLATINUM".into()));
        assert_eq!(asset.name(), "PLATINUM");
    }

    #[test]
    fn file_stem_replaces_spaces() {
        assert_eq!(Asset::NaturalGas.file_stem(), "NATURAL_GAS");
        assert_eq!(Asset::Gold.file_stem(), "GOLD");
    }

    #[test]
    fn parse_assets_list() {
        let assets = parse_assets("GOLD, silver,NATURAL GAS").unwrap();
        assert_eq!(
            assets,
            vec![Asset::Gold, Asset::Silver, Asset::NaturalGas]
        );
    }

    #[test]
    fn parse_assets_rejects_empty_token() {
        assert!(matches!(
            parse_assets("GOLD,,SILVER"),
            Err(AssetListError::EmptyToken)
        ));
    }

    #[test]
    fn parse_assets_rejects_duplicates() {
        assert!(matches!(
            parse_assets("GOLD,gold"),
            Err(AssetListError::DuplicateAsset(_))
        ));
    }
}
