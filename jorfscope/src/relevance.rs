use tracing::info;

use crate::ingestion::Article;

/// Terms that make a JORF entry worth surfacing for INSP preparation.
/// Matching is a plain case-insensitive substring test, so keep these
/// lowercase; no weighting or scoring is applied.
pub const RELEVANT_KEYWORDS: &[&str] = &[
    "politique publique",
    "fonction publique",
    "administration",
    "gouvernement",
    "ministre",
    "secrétaire d'état",
    "préfet",
    "directeur",
    "nomination",
    "décret",
    "loi",
    "ordonnance",
    "arrêté",
    "circulaire",
    "concours",
    "recrutement",
    "formation",
    "insp",
    "ena",
    "budget",
    "finance",
    "économie",
    "social",
    "santé",
    "éducation",
    "justice",
    "intérieur",
    "défense",
    "affaires étrangères",
    "transition écologique",
    "numérique",
    "innovation",
];

/// Pure inclusion test: does any keyword occur in title + description?
pub fn is_relevant(article: &Article) -> bool {
    let content = format!("{} {}", article.title, article.description).to_lowercase();
    RELEVANT_KEYWORDS.iter().any(|kw| content.contains(kw))
}

/// Keeps relevant articles, preserving feed order.
pub fn filter_relevant(articles: Vec<Article>) -> Vec<Article> {
    let total = articles.len();
    let relevant: Vec<Article> = articles.into_iter().filter(is_relevant).collect();
    info!("{} relevant articles found out of {}", relevant.len(), total);
    relevant
}
