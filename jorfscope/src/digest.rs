//! Chunked summarization: partition relevant articles into bounded groups,
//! request one summary per group, merge the results into a single digest.
//!
//! The partition (`chunk_articles`) and the merge (`merge_digest`) are pure
//! and unit-tested without any network; only `summarize_chunks` talks to the
//! completion endpoint.

use tracing::{info, warn};

use crate::ingestion::Article;
use crate::llm::{LlmProvider, LlmRequest};

/// Articles per completion request; 20 keeps a prompt around 6k tokens.
pub const CHUNK_SIZE: usize = 20;

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 400;

const SYSTEM_PROMPT: &str = "Tu es un expert en droit administratif et en préparation \
     aux concours de la fonction publique française.";

/// Shared header of every digest pushed to recipients.
pub const DIGEST_HEADER: &str = "📰 JOURNAL OFFICIEL - Résumé du jour 📰";

/// Exact answer the model is instructed to give when a chunk holds nothing notable.
const EMPTY_CHUNK_SENTINEL: &str = "Aucun article important dans ce lot.";

/// Responses starting with this are treated as "chunk had nothing" at merge time.
const EMPTY_CHUNK_PREFIX: &str = "Aucun article important";

/// Digest used when every chunk came back empty or sentinel.
pub const NOTHING_IMPORTANT_DIGEST: &str = "📰 JOURNAL OFFICIEL - Résumé du jour 📰\n\n\
     Aucun article particulièrement important aujourd'hui.";

/// Digest used when the filter kept nothing at all (no summarization happens).
pub const NOTHING_RELEVANT_DIGEST: &str = "📰 JOURNAL OFFICIEL - Résumé du jour 📰\n\n\
     Aucun article particulièrement pertinent pour la préparation INSP aujourd'hui.";

/// One endpoint response (or inline error placeholder); `index` is 1-based
/// and refers to the chunk's position in the original partition.
#[derive(Debug, Clone)]
pub struct ChunkSummary {
    pub index: usize,
    pub content: String,
}

/// Splits articles into consecutive chunks of at most [`CHUNK_SIZE`],
/// preserving feed order; the last chunk may be smaller.
pub fn chunk_articles(articles: &[Article]) -> Vec<&[Article]> {
    articles.chunks(CHUNK_SIZE).collect()
}

/// Truncates to `max` characters with an ellipsis marker.
/// Counts Unicode scalar values, never bytes (French text).
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max).collect();
        out.push_str("...");
        out
    }
}

/// Renders one chunk as numbered article blocks for the prompt.
pub fn render_chunk(chunk: &[Article]) -> String {
    let mut text = String::new();
    for (i, article) in chunk.iter().enumerate() {
        let title = truncate(&article.title, TITLE_MAX_CHARS);
        let description = truncate(&article.description, DESCRIPTION_MAX_CHARS);
        text.push_str(&format!(
            "\n{}. {}\n   Lien: {}\n   Description: {}\n",
            i + 1,
            title,
            article.link,
            description
        ));
    }
    text
}

/// User prompt for one chunk; embeds the chunk position so the model knows it
/// only sees a slice of the day's articles. Sub-headers are added at merge
/// time, so the model is told not to produce any.
fn chunk_prompt(rendered: &str, index: usize, total: usize) -> String {
    format!(
        r#"Tu es un assistant spécialisé dans l'analyse du Journal Officiel français pour des stagiaires préparant le concours de l'INSP.

Voici une partie des articles du Journal Officiel d'aujourd'hui (lot {index}/{total}) :

{rendered}

RÈGLES STRICTES :
- IGNORE complètement : nominations, départs à la retraite, mobilités, mutations, promotions internes
- IGNORE complètement : textes techniques sans impact politique majeur
- GARDE SEULEMENT : textes réglementaires majeurs, réformes importantes, politiques publiques nouvelles

Si aucun article ne correspond à ces critères, réponds simplement : "{EMPTY_CHUNK_SENTINEL}"

Format de sortie :
- N'ajoute ni en-tête ni titre de partie
- Utilise des emojis pour structurer (🔹, 📋, etc.)
- Contenu utile en 2-3 phrases maximum
- Maximum 500 caractères
- Ton neutre mais structuré
"#
    )
}

/// Runs one completion request per chunk, in order. A failed chunk becomes an
/// inline placeholder naming its index and the error; a single chunk's failure
/// never aborts the remaining chunks.
pub async fn summarize_chunks<P: LlmProvider + ?Sized>(
    provider: &P,
    articles: &[Article],
) -> Vec<ChunkSummary> {
    let chunks = chunk_articles(articles);
    let total = chunks.len();
    info!(
        "Articles split into {} chunks of at most {} articles",
        total, CHUNK_SIZE
    );

    let mut summaries = Vec::with_capacity(total);
    for (idx, chunk) in chunks.iter().enumerate() {
        let index = idx + 1;
        info!(
            "Processing chunk {}/{} with {} articles",
            index,
            total,
            chunk.len()
        );

        let request = LlmRequest {
            system: SYSTEM_PROMPT.to_string(),
            prompt: chunk_prompt(&render_chunk(chunk), index, total),
            max_tokens: Some(1000),
            temperature: Some(0.7),
            timeout_seconds: None,
        };

        let content = match provider.generate(request).await {
            Ok(response) => {
                info!(
                    "Chunk {}/{} summarized ({} tokens)",
                    index, total, response.usage.total_tokens
                );
                response.content
            }
            Err(e) => {
                warn!("Chunk {}/{} failed: {}", index, total, e);
                format!("Erreur lors du traitement du lot {} : {}", index, e)
            }
        };

        summaries.push(ChunkSummary { index, content });
    }

    summaries
}

fn part_header(index: usize) -> String {
    format!("📰 JOURNAL OFFICIEL - Partie {} 📰", index)
}

/// Merges per-chunk summaries into the final digest (pure).
///
/// Chunks whose content is empty or is the "nothing in this chunk" sentinel
/// are dropped. The shared header appears exactly once. Sub-headers are
/// attached here from the chunk index, and only when more than one chunk
/// contributed, so the single-chunk case needs no string stripping.
pub fn merge_digest(summaries: &[ChunkSummary]) -> String {
    let usable: Vec<&ChunkSummary> = summaries
        .iter()
        .filter(|s| {
            let content = s.content.trim();
            !content.is_empty() && !content.starts_with(EMPTY_CHUNK_PREFIX)
        })
        .collect();

    match usable.as_slice() {
        [] => NOTHING_IMPORTANT_DIGEST.to_string(),
        [only] => format!("{}\n\n{}", DIGEST_HEADER, only.content.trim()),
        several => {
            let mut digest = format!("{}\n\n", DIGEST_HEADER);
            for summary in several {
                digest.push_str(&part_header(summary.index));
                digest.push('\n');
                digest.push_str(summary.content.trim());
                digest.push_str("\n\n");
            }
            digest
        }
    }
}

/// Chunked summarization end to end: partition, one request per chunk, merge.
pub async fn build_digest<P: LlmProvider + ?Sized>(provider: &P, articles: &[Article]) -> String {
    let summaries = summarize_chunks(provider, articles).await;
    let digest = merge_digest(&summaries);
    info!("Final digest built from {} chunk summaries", summaries.len());
    digest
}
