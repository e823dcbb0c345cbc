//! Basic enumerations shared by the dashboard views

use serde::{Deserialize, Serialize};

/// Which composition a pie chart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionKind {
    /// Assets / liabilities / equity of the latest month
    Balance,
    /// Asset categories
    Assets,
    /// Liability categories
    Liabilities,
    /// Equity components
    Equity,
    /// Own vs third-party portfolio
    Portfolio,
    /// Short vs long term split of the own portfolio
    OwnPortfolio,
    /// Income categories accumulated over the range
    Income,
    /// Expense categories accumulated over the range
    Expenses,
}

impl CompositionKind {
    pub const ALL: [CompositionKind; 8] = [
        CompositionKind::Balance,
        CompositionKind::Assets,
        CompositionKind::Liabilities,
        CompositionKind::Equity,
        CompositionKind::Portfolio,
        CompositionKind::OwnPortfolio,
        CompositionKind::Income,
        CompositionKind::Expenses,
    ];

    /// Card title (without the month suffix)
    pub fn title(&self) -> &'static str {
        match self {
            CompositionKind::Balance => "Balance Sheet Composition",
            CompositionKind::Assets => "Asset Details",
            CompositionKind::Liabilities => "Liability Details",
            CompositionKind::Equity => "Equity Details",
            CompositionKind::Portfolio => "Total Portfolio Distribution",
            CompositionKind::OwnPortfolio => "Own Portfolio Details",
            CompositionKind::Income => "Income Composition",
            CompositionKind::Expenses => "Expense Composition",
        }
    }
}

/// Portfolio card state: the overall split, or the own-portfolio drill-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortfolioView {
    Main,
    Own,
}

impl Default for PortfolioView {
    fn default() -> Self {
        PortfolioView::Main
    }
}

impl PortfolioView {
    /// The view reached by clicking a slice; only "Own Portfolio" drills down
    pub fn after_click(self, slice_name: &str) -> Self {
        match self {
            PortfolioView::Main if slice_name == crate::reports::OWN_PORTFOLIO => {
                PortfolioView::Own
            }
            other => other,
        }
    }

    /// The view reached by the back link
    pub fn back(self) -> Self {
        PortfolioView::Main
    }
}

impl std::str::FromStr for PortfolioView {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" | "" => Ok(PortfolioView::Main),
            "own" | "propia" => Ok(PortfolioView::Own),
            _ => Err(format!("Invalid portfolio view: {}", s)),
        }
    }
}

impl std::fmt::Display for PortfolioView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioView::Main => write!(f, "main"),
            PortfolioView::Own => write!(f, "own"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_titles_are_distinct() {
        let mut titles: Vec<_> = CompositionKind::ALL.iter().map(|k| k.title()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), CompositionKind::ALL.len());
    }

    #[test]
    fn test_portfolio_view_toggle() {
        let view = PortfolioView::default();
        assert_eq!(view, PortfolioView::Main);
        assert_eq!(view.after_click("Third Party Portfolio"), PortfolioView::Main);

        let own = view.after_click("Own Portfolio");
        assert_eq!(own, PortfolioView::Own);
        assert_eq!(own.after_click("Short Term"), PortfolioView::Own);
        assert_eq!(own.back(), PortfolioView::Main);
    }

    #[test]
    fn test_portfolio_view_from_str() {
        assert_eq!("own".parse::<PortfolioView>().unwrap(), PortfolioView::Own);
        assert_eq!("MAIN".parse::<PortfolioView>().unwrap(), PortfolioView::Main);
        assert!("other".parse::<PortfolioView>().is_err());
    }
}
