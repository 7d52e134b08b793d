// src/site/description.rs
// =============================================================================
// Builds the description.txt content for a dog.
//
// The listing's description block ends with boilerplate we don't want: the
// adoption fee breakdown, or failing that the "show less" toggle. We cut at
// whichever comes first in that order, then append how to apply.
// =============================================================================

const ADOPTION_FEE_MARKER: &str = "Adoption fee includes the following";
const SHOW_LESS_MARKER: &str = "show less";

pub const ADOPTION_FOOTER: &str = "👇👇SUBMIT AN APPLICATION HERE: 👇👇
https://2babrescue.com/adoption-fees-info";

pub fn build_description(full_description: &str) -> String {
    let cut = full_description
        .find(ADOPTION_FEE_MARKER)
        .or_else(|| full_description.find(SHOW_LESS_MARKER))
        .unwrap_or(full_description.len());

    format!("{}\n{}", full_description[..cut].trim(), ADOPTION_FOOTER)
}
