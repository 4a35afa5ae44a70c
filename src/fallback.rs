//! Pre-vetted fallback questions per category bucket
//!
//! Used when the generator yields too few acceptable candidates. Entries are
//! exempt from the relevance and forbidden checks; they only go through
//! duplicate detection.

use crate::categories::CategoryBucket;

const ELECTRONICS: &[&str] = &[
    "Is the device compliant with RoHS material restrictions?",
    "Are safety tests available for batteries or heating components?",
    "Are repair manuals or spare parts available for servicing?",
    "Are key components recyclable or reusable?",
    "Which certifications (CE, FCC, UL) has the product passed?",
    "Where are the main circuit components sourced from?",
];

const SKINCARE: &[&str] = &[
    "Are there irritation or sensitization test reports for the formula?",
    "Do suppliers provide provenance for botanical ingredients?",
    "Is a Certificate of Analysis available for active ingredients?",
    "Are allergens disclosed clearly for sensitive users?",
    "Has the product been dermatologically tested?",
    "Are preservatives used, and at what concentrations?",
];

const PACKAGED: &[&str] = &[
    "Are all ingredients traceable to verified suppliers?",
    "What quality control steps are followed during processing?",
    "Are preservatives or additives documented clearly?",
    "Are third-party lab tests available for contaminants?",
    "Is the packaging material food-safe and recyclable?",
    "How are allergen cross-contact risks controlled in the facility?",
];

const RAW: &[&str] = &[
    "What farming practices were used during cultivation?",
    "Were pesticides or fertilizers applied during growth?",
    "From which region were the raw ingredients sourced?",
    "How was the product stored and transported after harvest?",
    "Are residue tests performed before packing?",
    "Can each lot be traced back to the originating farm?",
];

const SUPPLEMENT: &[&str] = &[
    "Is a Certificate of Analysis available for each batch?",
    "Has the product undergone purity or potency testing?",
    "Are all active ingredients fully traceable to origin?",
    "Are stability and shelf-life studies documented?",
    "Is the facility GMP certified?",
    "Are heavy metal screening results available?",
];

const GENERIC: &[&str] = &[
    "Are third-party compliance certificates available?",
    "Can you share supplier traceability for main materials?",
    "Is there documentation validating major product claims?",
    "Are quality or safety test reports available?",
    "How is the product's environmental impact measured?",
    "Are audits performed on key suppliers?",
];

/// The fallback pool for `bucket`, in priority order
pub fn pool(bucket: CategoryBucket) -> &'static [&'static str] {
    match bucket {
        CategoryBucket::Electronics => ELECTRONICS,
        CategoryBucket::Skincare => SKINCARE,
        CategoryBucket::Packaged => PACKAGED,
        CategoryBucket::Raw => RAW,
        CategoryBucket::Supplement => SUPPLEMENT,
        CategoryBucket::Generic => GENERIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::is_forbidden;
    use crate::normalize::similarity;

    const DEFAULT_THRESHOLD: f64 = 0.75;

    #[test]
    fn test_every_bucket_has_a_pool() {
        for bucket in CategoryBucket::ALL {
            assert!(pool(bucket).len() >= 5, "{} pool too small", bucket);
        }
    }

    #[test]
    fn test_pools_contain_no_forbidden_phrasing() {
        for bucket in CategoryBucket::ALL {
            for q in pool(bucket) {
                assert!(!is_forbidden(q), "{}: {}", bucket, q);
            }
        }
    }

    #[test]
    fn test_pools_respect_bucket_exclusions() {
        for bucket in CategoryBucket::ALL {
            for q in pool(bucket) {
                let lower = q.to_lowercase();
                for term in bucket.excluded_terms() {
                    assert!(!lower.contains(term), "{}: {}", bucket, q);
                }
            }
        }
    }

    #[test]
    fn test_pool_entries_are_not_near_duplicates() {
        // bucket pool plus generic must stay distinct so fallback fills fully
        for bucket in CategoryBucket::ALL {
            let mut entries: Vec<&str> = pool(bucket).to_vec();
            if bucket != CategoryBucket::Generic {
                entries.extend_from_slice(pool(CategoryBucket::Generic));
            }
            for (i, a) in entries.iter().enumerate() {
                for b in &entries[i + 1..] {
                    assert!(
                        similarity(a, b) < DEFAULT_THRESHOLD,
                        "near-duplicate fallbacks: {:?} / {:?}",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_pool_entries_are_questions() {
        for bucket in CategoryBucket::ALL {
            for q in pool(bucket) {
                assert!(q.ends_with('?'));
                assert_eq!(q.trim(), *q);
            }
        }
    }
}
