//! Symbol Taxonomy
//!
//! Named symbol sets the classifier and aggregator consult.

use serde::Serialize;

/// Address some indexers report for a chain's native asset instead of `null`
pub const NATIVE_PLACEHOLDER_ADDRESS: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

/// A tagged, immutable set of token symbols
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SymbolSet {
    /// Short identifier for logs and diagnostics
    pub tag: &'static str,

    /// Member symbols, stored upper-case
    pub symbols: &'static [&'static str],
}

impl SymbolSet {
    /// Case-insensitive membership test
    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.trim();
        self.symbols.iter().any(|s| s.eq_ignore_ascii_case(symbol))
    }

    pub const fn len(&self) -> usize {
        self.symbols.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// High-volatility community tokens with no fundamentals to anchor price
pub const MEME_TOKENS: SymbolSet = SymbolSet {
    tag: "meme",
    symbols: &[
        "DOGE", "SHIB", "PEPE", "FLOKI", "BONK", "WIF", "BRETT", "MOG", "TURBO",
        "BABYDOGE", "WOJAK", "LADYS", "NEIRO", "POPCAT", "TOSHI", "DEGEN", "SPX",
        "MEME", "ELON",
    ],
};

// Major assets: native gas token, its wrapped form, and the chain's leading
// reserve asset.

pub const ETHEREUM_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:ethereum",
    symbols: &["ETH", "WETH", "WBTC"],
};

pub const BSC_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:bsc",
    symbols: &["BNB", "WBNB", "BTCB"],
};

pub const POLYGON_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:polygon",
    symbols: &["POL", "MATIC", "WPOL", "WMATIC", "WETH"],
};

pub const ARBITRUM_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:arbitrum",
    symbols: &["ETH", "WETH", "WBTC"],
};

pub const OPTIMISM_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:optimism",
    symbols: &["ETH", "WETH", "WBTC"],
};

pub const BASE_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:base",
    symbols: &["ETH", "WETH", "CBBTC"],
};

pub const AVALANCHE_MAJORS: SymbolSet = SymbolSet {
    tag: "majors:avalanche",
    symbols: &["AVAX", "WAVAX", "BTC.B"],
};

/// Whether an address is the native-asset placeholder
pub fn is_native_placeholder(address: &str) -> bool {
    address.trim().eq_ignore_ascii_case(NATIVE_PLACEHOLDER_ADDRESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignores_case_and_whitespace() {
        assert!(MEME_TOKENS.contains("pepe"));
        assert!(MEME_TOKENS.contains(" Doge "));
        assert!(!MEME_TOKENS.contains("USDC"));
        assert!(BASE_MAJORS.contains("cbBTC"));
    }

    #[test]
    fn test_sets_are_stored_upper_case() {
        for set in [
            MEME_TOKENS,
            ETHEREUM_MAJORS,
            BSC_MAJORS,
            POLYGON_MAJORS,
            ARBITRUM_MAJORS,
            OPTIMISM_MAJORS,
            BASE_MAJORS,
            AVALANCHE_MAJORS,
        ] {
            assert!(!set.is_empty(), "{} is empty", set.tag);
            for symbol in set.symbols {
                assert_eq!(*symbol, symbol.to_uppercase(), "{} in {}", symbol, set.tag);
            }
        }
    }

    #[test]
    fn test_majors_and_memes_disjoint() {
        for symbol in MEME_TOKENS.symbols {
            assert!(!ETHEREUM_MAJORS.contains(symbol));
            assert!(!BSC_MAJORS.contains(symbol));
        }
    }

    #[test]
    fn test_native_placeholder() {
        assert!(is_native_placeholder("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"));
        assert!(!is_native_placeholder("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"));
    }
}
