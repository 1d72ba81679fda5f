//! End-to-end ingestion test: synthesized PDF → chunk → embed (stub) →
//! persisted index → reopen → retrieve.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use medqa_rag::{
    DiskVectorStore, EmbeddingProvider, Ingestor, RagConfig, RecursiveChunker, Result, Retriever,
    load_corpus,
};
use tempfile::TempDir;

/// Minimal valid PDF with one page per entry in `pages`. Builds the body
/// then the xref with correct byte offsets so pdf-extract can parse it.
/// Page text must avoid parentheses and backslashes.
fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let n = pages.len();
    let font_obj = 3 + 2 * n;
    let mut out = Vec::new();
    let mut offsets = Vec::new();

    out.extend_from_slice(b"%PDF-1.4\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");

    offsets.push(out.len());
    let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();
    out.extend_from_slice(
        format!("2 0 obj << /Type /Pages /Kids [{}] /Count {n} >> endobj\n", kids.join(" "))
            .as_bytes(),
    );

    for (i, text) in pages.iter().enumerate() {
        let page_obj = 3 + 2 * i;
        let content_obj = page_obj + 1;

        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{page_obj} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Contents {content_obj} 0 R /Resources << /Font << /F1 {font_obj} 0 R >> >> >> endobj\n"
            )
            .as_bytes(),
        );

        let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET\n");
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{content_obj} 0 obj << /Length {} >> stream\n{stream}endstream endobj\n",
                stream.len()
            )
            .as_bytes(),
        );
    }

    offsets.push(out.len());
    out.extend_from_slice(
        format!("{font_obj} 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica >> endobj\n")
            .as_bytes(),
    );

    let xref_start = out.len();
    let total = font_obj + 1;
    out.extend_from_slice(format!("xref\n0 {total}\n").as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!("trailer << /Size {total} /Root 1 0 R >>\nstartxref\n{xref_start}\n%%EOF\n")
            .as_bytes(),
    );
    out
}

const KEYWORDS: &[&str] =
    &["telehealth", "readmission", "privacy", "security", "hospital", "digital"];

/// Deterministic keyword-presence embedding, the same function at build
/// and query time.
struct StubEmbedder;

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS.iter().map(|k| if lower.contains(k) { 1.0 } else { 0.0 }).collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORDS.len()
    }
}

const PAGE_TEXTS: &[&str] = &[
    "General overview of the hospital digital program",
    "Privacy and security considerations for patient records",
    "Telehealth reduces readmission by 12 percent",
];

async fn build_index(corpus: &TempDir, index_path: &std::path::Path) {
    fs::write(corpus.path().join("policy.pdf"), minimal_pdf(PAGE_TEXTS)).unwrap();

    let store = Arc::new(DiskVectorStore::new());
    let ingestor = Ingestor::builder()
        .chunker(Arc::new(RecursiveChunker::new(700, 100)))
        .embedding_provider(Arc::new(StubEmbedder))
        .vector_store(store.clone())
        .build()
        .unwrap();

    let report = ingestor.ingest(corpus.path()).await.unwrap();
    assert_eq!(report.pages, 3);
    assert_eq!(report.chunks, 3);

    store.persist(index_path).await.unwrap();
}

#[tokio::test]
async fn ingest_persist_reopen_retrieve() {
    let corpus = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    let index_path = index_dir.path().join("index.json");

    build_index(&corpus, &index_path).await;

    let store = Arc::new(DiskVectorStore::open(&index_path).unwrap());
    let retriever = Retriever::new(RagConfig::default(), Arc::new(StubEmbedder), store);

    let evidence =
        retriever.retrieve("What does telehealth do to readmission?", None).await.unwrap();
    assert!(!evidence.is_empty());
    assert_eq!(evidence[0].source_id, "policy.pdf");
    assert_eq!(evidence[0].page_number, 2);
    assert!(evidence[0].text.contains("readmission by 12 percent"));
    assert_eq!(evidence[0].citation(), "policy.pdf (page 3)");
}

#[test]
fn blank_pages_are_dropped_but_numbering_is_preserved() {
    let corpus = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("policy.pdf"),
        minimal_pdf(&[
            "Hospital digital program overview",
            "   ",
            "Telehealth reduces readmission",
        ]),
    )
    .unwrap();

    let pages = load_corpus(corpus.path()).unwrap();
    let numbers: Vec<usize> = pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![0, 2]);
}

#[tokio::test]
async fn off_corpus_query_yields_no_evidence() {
    let corpus = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    let index_path = index_dir.path().join("index.json");

    build_index(&corpus, &index_path).await;

    let store = Arc::new(DiskVectorStore::open(&index_path).unwrap());
    let retriever = Retriever::new(RagConfig::default(), Arc::new(StubEmbedder), store);

    let evidence = retriever.retrieve("What is the capital of France?", None).await.unwrap();
    assert!(evidence.is_empty());
}

#[tokio::test]
async fn source_filter_excludes_other_documents() {
    let corpus = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    let index_path = index_dir.path().join("index.json");

    build_index(&corpus, &index_path).await;

    let store = Arc::new(DiskVectorStore::open(&index_path).unwrap());
    let retriever = Retriever::new(RagConfig::default(), Arc::new(StubEmbedder), store);

    let evidence = retriever
        .retrieve("What does telehealth do to readmission?", Some("missing.pdf"))
        .await
        .unwrap();
    assert!(evidence.is_empty());
}
