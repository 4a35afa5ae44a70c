//! Category buckets: keyword classification and per-bucket exclusions
//!
//! Classification is a priority-ordered table, first substring hit wins.
//! Order is fixed so that overlapping category strings always land in the
//! same bucket:
//!
//! ```text
//! electronics > skincare > supplement > packaged > raw > generic
//! ```
//!
//! e.g. "vitamin food supplement" → supplement, "organic snack" → packaged.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product category bucket used for fallback pools and exclusion rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryBucket {
    Electronics,
    Skincare,
    Packaged,
    Raw,
    Supplement,
    Generic,
}

/// Classification table, evaluated top to bottom
pub const CATEGORY_KEYWORDS: &[(CategoryBucket, &[&str])] = &[
    (
        CategoryBucket::Electronics,
        &["electronic", "device", "gadget", "appliance", "battery", "charger"],
    ),
    (
        CategoryBucket::Skincare,
        &["skincare", "cosmetic", "cream", "lotion", "serum", "makeup", "sunscreen"],
    ),
    (
        CategoryBucket::Supplement,
        &["supplement", "vitamin", "capsule", "tablet", "protein powder"],
    ),
    (
        CategoryBucket::Packaged,
        &["snack", "food", "beverage", "packaged", "processed", "drink"],
    ),
    (
        CategoryBucket::Raw,
        &[
            "vegetable", "fruit", "grain", "produce", "raw", "nuts", "almond", "seed", "legume",
            "organic",
        ],
    ),
];

/// Terms a question must not contain for a given bucket
///
/// Ingredient/formulation questions make no sense for hardware.
const EXCLUDED_TERMS: &[(CategoryBucket, &[&str])] = &[(
    CategoryBucket::Electronics,
    &["ingredient", "formulation", "preservative", "allergen"],
)];

impl CategoryBucket {
    pub const ALL: [CategoryBucket; 6] = [
        CategoryBucket::Electronics,
        CategoryBucket::Skincare,
        CategoryBucket::Packaged,
        CategoryBucket::Raw,
        CategoryBucket::Supplement,
        CategoryBucket::Generic,
    ];

    /// Resolve a free-text category. Input is trimmed and lowercased here.
    pub fn classify(category: &str) -> Self {
        let key = category.trim().to_lowercase();
        if key.is_empty() {
            return CategoryBucket::Generic;
        }

        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| key.contains(kw)))
            .map(|(bucket, _)| *bucket)
            .unwrap_or(CategoryBucket::Generic)
    }

    /// Terms excluded from accepted questions in this bucket (may be empty)
    pub fn excluded_terms(&self) -> &'static [&'static str] {
        EXCLUDED_TERMS
            .iter()
            .find(|(bucket, _)| bucket == self)
            .map(|(_, terms)| *terms)
            .unwrap_or(&[])
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryBucket::Electronics => "electronics",
            CategoryBucket::Skincare => "skincare",
            CategoryBucket::Packaged => "packaged",
            CategoryBucket::Raw => "raw",
            CategoryBucket::Supplement => "supplement",
            CategoryBucket::Generic => "generic",
        }
    }
}

impl fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CategoryBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        CategoryBucket::ALL
            .into_iter()
            .find(|b| b.name() == key)
            .ok_or_else(|| format!("Unknown category bucket: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_bucket() {
        assert_eq!(CategoryBucket::classify("Electronics"), CategoryBucket::Electronics);
        assert_eq!(CategoryBucket::classify("smart home gadget"), CategoryBucket::Electronics);
        assert_eq!(CategoryBucket::classify("face serum"), CategoryBucket::Skincare);
        assert_eq!(CategoryBucket::classify("potato snack"), CategoryBucket::Packaged);
        assert_eq!(CategoryBucket::classify("fresh vegetables"), CategoryBucket::Raw);
        assert_eq!(CategoryBucket::classify("Vitamin D3"), CategoryBucket::Supplement);
    }

    #[test]
    fn test_classify_defaults_to_generic() {
        assert_eq!(CategoryBucket::classify(""), CategoryBucket::Generic);
        assert_eq!(CategoryBucket::classify("   "), CategoryBucket::Generic);
        assert_eq!(CategoryBucket::classify("furniture"), CategoryBucket::Generic);
    }

    #[test]
    fn test_classify_trims_and_lowercases() {
        assert_eq!(CategoryBucket::classify("  SKINCARE  "), CategoryBucket::Skincare);
    }

    #[test]
    fn test_classify_organic_almonds_is_raw() {
        assert_eq!(CategoryBucket::classify("organic almonds"), CategoryBucket::Raw);
    }

    #[test]
    fn test_classify_priority_on_overlap() {
        // supplement is checked before packaged
        assert_eq!(
            CategoryBucket::classify("food supplement"),
            CategoryBucket::Supplement
        );
        // packaged is checked before raw
        assert_eq!(CategoryBucket::classify("organic snack"), CategoryBucket::Packaged);
        assert_eq!(CategoryBucket::classify("dried fruit snack"), CategoryBucket::Packaged);
        // electronics beats everything
        assert_eq!(
            CategoryBucket::classify("battery powered skincare device"),
            CategoryBucket::Electronics
        );
        // skincare is checked before supplement
        assert_eq!(
            CategoryBucket::classify("vitamin c cream"),
            CategoryBucket::Skincare
        );
    }

    #[test]
    fn test_excluded_terms_only_for_electronics() {
        assert!(CategoryBucket::Electronics.excluded_terms().contains(&"ingredient"));
        assert!(CategoryBucket::Electronics.excluded_terms().contains(&"formulation"));
        for bucket in CategoryBucket::ALL {
            if bucket != CategoryBucket::Electronics {
                assert!(bucket.excluded_terms().is_empty(), "{} has exclusions", bucket);
            }
        }
    }

    #[test]
    fn test_bucket_name_round_trip() {
        for bucket in CategoryBucket::ALL {
            assert_eq!(bucket.to_string().parse::<CategoryBucket>().unwrap(), bucket);
        }
        assert!("toys".parse::<CategoryBucket>().is_err());
    }

    #[test]
    fn test_table_covers_every_non_generic_bucket() {
        for bucket in CategoryBucket::ALL {
            let listed = CATEGORY_KEYWORDS.iter().any(|(b, _)| *b == bucket);
            assert_eq!(listed, bucket != CategoryBucket::Generic);
        }
    }
}
