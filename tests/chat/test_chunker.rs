// Chunking determinism and reconstruction across parameter combinations

use ragchat_node::corpus::chunk_document;

fn sample_document() -> String {
    "Our mission is to enable chat commerce. We help businesses talk to their \
     customers over the channels they already use. Billing runs monthly and \
     invoices are sent by email. Support is available around the clock."
        .repeat(3)
}

#[test]
fn test_chunking_deterministic_across_parameters() {
    let doc = sample_document();
    for (size, overlap) in [(50, 0), (50, 10), (64, 13), (100, 99), (600, 80)] {
        let a = chunk_document(&doc, size, overlap);
        let b = chunk_document(&doc, size, overlap);
        assert_eq!(a, b, "size={} overlap={}", size, overlap);
        assert!(!a.is_empty());
    }
}

#[test]
fn test_reconstruction_property() {
    let doc = sample_document();
    for (size, overlap) in [(50, 0), (50, 10), (64, 13), (37, 7)] {
        let chunks = chunk_document(&doc, size, overlap);

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                rebuilt.push_str(&chunk.text);
            } else {
                rebuilt.extend(chunk.text.chars().skip(overlap));
            }
        }
        assert_eq!(rebuilt, doc, "size={} overlap={}", size, overlap);
    }
}

#[test]
fn test_offsets_advance_by_stride() {
    let doc = sample_document();
    let (size, overlap) = (60, 15);
    let chunks = chunk_document(&doc, size, overlap);

    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.source_offset, i * (size - overlap));
    }
}

#[test]
fn test_every_chunk_bounded_by_size() {
    let doc = sample_document();
    let chunks = chunk_document(&doc, 48, 12);
    for chunk in &chunks {
        assert!(chunk.text.chars().count() <= 48);
    }
    // Only the final chunk may be shorter
    for chunk in &chunks[..chunks.len() - 1] {
        assert_eq!(chunk.text.chars().count(), 48);
    }
}
