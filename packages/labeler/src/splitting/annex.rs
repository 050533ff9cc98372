//! Annex trimming.

use super::types::Article;
use crate::grammar::is_annex_heading;

/// Drop the first ANNEX-headed article and everything after it.
///
/// Only the first line of each article is tested. When no article starts
/// with an ANNEX heading the input is returned unchanged.
#[must_use]
pub fn trim_annexes(mut articles: Vec<Article>) -> Vec<Article> {
    let first_annex = articles
        .iter()
        .position(|a| a.first_line().is_some_and(is_annex_heading));

    if let Some(index) = first_annex {
        let dropped = articles.len() - index;
        tracing::debug!(kept = index, dropped, "Trimmed trailing annex material");
        articles.truncate(index);
    }

    articles
}
