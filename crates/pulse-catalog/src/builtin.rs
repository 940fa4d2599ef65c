//! Built-in NSE universe.

use crate::catalog::{InstrumentCatalog, MarketCapGroup, Sector, SetDefinition};

const SECTORS: &[(&str, &str, f64, &[&str])] = &[
    (
        "technology",
        "Information Technology & Software Services",
        0.20,
        &[
            "TCS.NS", "INFY.NS", "WIPRO.NS", "HCLTECH.NS", "TECHM.NS", "MINDTREE.NS",
            "MPHASIS.NS", "LTI.NS",
        ],
    ),
    (
        "banking",
        "Banking & Financial Services",
        0.18,
        &[
            "HDFCBANK.NS", "ICICIBANK.NS", "SBIN.NS", "KOTAKBANK.NS", "AXISBANK.NS",
            "INDUSINDBK.NS", "FEDERALBNK.NS", "BANDHANBNK.NS",
        ],
    ),
    (
        "energy",
        "Oil, Gas & Energy",
        0.15,
        &[
            "RELIANCE.NS", "ONGC.NS", "IOC.NS", "BPCL.NS", "GAIL.NS", "HINDPETRO.NS",
            "ADANIGREEN.NS", "TATAPOWER.NS",
        ],
    ),
    (
        "pharmaceuticals",
        "Pharmaceuticals & Healthcare",
        0.10,
        &[
            "SUNPHARMA.NS", "DRREDDY.NS", "CIPLA.NS", "DIVISLAB.NS", "BIOCON.NS", "LUPIN.NS",
            "AUROPHARMA.NS", "TORNTPHARM.NS",
        ],
    ),
    (
        "fmcg",
        "Fast Moving Consumer Goods",
        0.12,
        &[
            "HINDUNILVR.NS", "ITC.NS", "BRITANNIA.NS", "DABUR.NS", "MARICO.NS", "GODREJCP.NS",
            "COLPAL.NS", "NESTLEIND.NS",
        ],
    ),
    (
        "automobile",
        "Automotive & Auto Components",
        0.08,
        &[
            "MARUTI.NS", "TATAMOTORS.NS", "M&M.NS", "BAJAJ-AUTO.NS", "HEROMOTOCO.NS",
            "EICHERMOT.NS", "ASHOKLEY.NS", "BOSCHLTD.NS",
        ],
    ),
    (
        "metals",
        "Metals & Mining",
        0.07,
        &[
            "TATASTEEL.NS", "HINDALCO.NS", "JSWSTEEL.NS", "SAIL.NS", "COALINDIA.NS", "VEDL.NS",
            "JINDALSTEL.NS", "NMDC.NS",
        ],
    ),
    (
        "infrastructure",
        "Infrastructure & Construction",
        0.05,
        &[
            "LT.NS", "ULTRACEMCO.NS", "GRASIM.NS", "SHREECEM.NS", "RAMCOCEM.NS", "ACC.NS",
            "AMBUJACEMENT.NS", "INFRATEL.NS",
        ],
    ),
    (
        "telecom",
        "Telecommunications",
        0.03,
        &["BHARTIARTL.NS", "IDEA.NS"],
    ),
    (
        "utilities",
        "Power & Utilities",
        0.02,
        &["POWERGRID.NS", "NTPC.NS", "TATAPOWER.NS", "ADANIPOWER.NS", "JSPL.NS"],
    ),
];

const MARKET_CAPS: &[(&str, &[&str])] = &[
    (
        "large_cap",
        &[
            "TCS.NS", "RELIANCE.NS", "HDFCBANK.NS", "INFY.NS", "ICICIBANK.NS", "LT.NS",
            "SBIN.NS", "ITC.NS", "KOTAKBANK.NS", "HINDUNILVR.NS",
        ],
    ),
    (
        "mid_cap",
        &[
            "WIPRO.NS", "HCLTECH.NS", "TECHM.NS", "AXISBANK.NS", "ULTRACEMCO.NS", "MARUTI.NS",
            "SUNPHARMA.NS", "BAJAJ-AUTO.NS", "DRREDDY.NS", "BRITANNIA.NS",
        ],
    ),
    (
        "small_cap",
        &[
            "MINDTREE.NS", "MPHASIS.NS", "FEDERALBNK.NS", "BANDHANBNK.NS", "LUPIN.NS",
            "AUROPHARMA.NS", "GODREJCP.NS", "EICHERMOT.NS",
        ],
    ),
];

const NIFTY_50_SAMPLE: &[&str] = &[
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "INFY.NS", "HINDUNILVR.NS", "ICICIBANK.NS",
    "KOTAKBANK.NS", "SBIN.NS", "LT.NS", "ITC.NS", "AXISBANK.NS", "BHARTIARTL.NS", "MARUTI.NS",
    "ASIANPAINT.NS", "HCLTECH.NS",
];

const DIVERSIFIED: &[&str] = &[
    "TCS.NS", "HDFCBANK.NS", "RELIANCE.NS", "SUNPHARMA.NS", "HINDUNILVR.NS", "MARUTI.NS",
    "TATASTEEL.NS", "LT.NS", "BHARTIARTL.NS", "POWERGRID.NS",
];

fn strings(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn nse_universe() -> InstrumentCatalog {
    let sectors = SECTORS
        .iter()
        .map(|(name, description, weight, symbols)| Sector {
            name: name.to_string(),
            description: description.to_string(),
            weight: Some(*weight),
            symbols: strings(symbols),
        })
        .collect();

    let market_caps = MARKET_CAPS
        .iter()
        .map(|(name, symbols)| MarketCapGroup {
            name: name.to_string(),
            symbols: strings(symbols),
        })
        .collect();

    let sets = vec![
        SetDefinition {
            name: "nifty_50_sample".into(),
            symbols: strings(NIFTY_50_SAMPLE),
            ..Default::default()
        },
        SetDefinition {
            name: "tech_focused".into(),
            sectors: vec!["technology".into()],
            ..Default::default()
        },
        SetDefinition {
            name: "banking_focused".into(),
            sectors: vec!["banking".into()],
            ..Default::default()
        },
        SetDefinition {
            name: "diversified_portfolio".into(),
            symbols: strings(DIVERSIFIED),
            ..Default::default()
        },
        SetDefinition {
            name: "comprehensive".into(),
            all_sectors: true,
            ..Default::default()
        },
    ];

    // Static tables, checked by the tests below.
    InstrumentCatalog {
        sectors,
        market_caps,
        sets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let builtin = nse_universe();
        let rebuilt = InstrumentCatalog::new(
            builtin.sectors.clone(),
            builtin.market_caps.clone(),
            builtin.sets.clone(),
        );
        assert_eq!(rebuilt.unwrap(), builtin);
    }

    #[test]
    fn test_builtin_shape() {
        let catalog = nse_universe();

        assert_eq!(catalog.sectors().len(), 10);
        assert_eq!(catalog.market_caps().len(), 3);
        assert_eq!(
            catalog.set_names(),
            vec![
                "nifty_50_sample",
                "tech_focused",
                "banking_focused",
                "diversified_portfolio",
                "comprehensive"
            ]
        );
        // TATAPOWER.NS is listed under both energy and utilities.
        assert_eq!(catalog.universe().len(), 70);

        let total_weight: f64 = catalog.sector_weights().iter().map(|(_, w)| w).sum();
        assert!((total_weight - 1.0).abs() < 1e-9);
    }
}
