use super::*;

fn config(max: usize, overlap: usize) -> ChunkingConfig {
    ChunkingConfig {
        max_chunk_chars: max,
        overlap_chars: overlap,
    }
}

#[test]
fn empty_input_yields_no_chunks() {
    assert!(chunk_text("", &ChunkingConfig::default()).is_empty());
}

#[test]
fn whitespace_only_input_yields_no_chunks() {
    assert!(chunk_text("   \n\t  \n", &ChunkingConfig::default()).is_empty());
}

#[test]
fn short_text_is_a_single_chunk() {
    let chunks = chunk_text("  Senior Rust engineer, 8 years.  ", &ChunkingConfig::default());

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "Senior Rust engineer, 8 years.");
    assert_eq!(chunks[0].chunk_index, 0);
}

#[test]
fn overlapping_windows_at_expected_offsets() {
    // 2500 characters, window 1200, overlap 200 -> stride 1000, three chunks
    // covering [0..1200], [1000..2200], [2000..2500].
    let text: String = ('a'..='z').cycle().take(2500).collect();
    let chunks = chunk_text(&text, &config(1200, 200));

    assert_eq!(chunks.len(), 3);
    let expect = |start: usize, end: usize| -> String { text.chars().skip(start).take(end - start).collect() };
    assert_eq!(chunks[0].content, expect(0, 1200));
    assert_eq!(chunks[1].content, expect(1000, 2200));
    assert_eq!(chunks[2].content, expect(2000, 2500));
    assert_eq!(
        chunks.iter().map(|c| c.chunk_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn final_partial_window_is_emitted() {
    let text = "abcdefghij";
    let chunks = chunk_text(text, &config(4, 0));

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[2].content, "ij");
}

#[test]
fn adjacent_chunks_share_the_overlap() {
    let text: String = "0123456789".repeat(3);
    let chunks = chunk_text(&text, &config(10, 4));

    // stride 6: the last 4 characters of each chunk open the next one
    for pair in chunks.windows(2) {
        let tail: String = pair[0].content.chars().skip(6).collect();
        let head: String = pair[1].content.chars().take(4).collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn overlap_not_smaller_than_window_disables_overlap() {
    let text = "abcdefgh";
    for overlap in [4, 7] {
        let chunks = chunk_text(text, &config(4, overlap));
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "abcd");
        assert_eq!(chunks[1].content, "efgh");
    }
}

#[test]
fn whitespace_windows_do_not_consume_indexes() {
    // Middle window is entirely whitespace; indexes stay gapless.
    let text = "abcd    efgh";
    let chunks = chunk_text(text, &config(4, 0));

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], TextChunk {
        content: "abcd".to_string(),
        chunk_index: 0
    });
    assert_eq!(chunks[1], TextChunk {
        content: "efgh".to_string(),
        chunk_index: 1
    });
}

#[test]
fn multibyte_text_splits_on_character_boundaries() {
    let text = "日本語のテキスト".repeat(50);
    let chunks = chunk_text(&text, &config(30, 5));

    assert!(!chunks.is_empty());
    let reassembled: usize = chunks.iter().map(|c| c.content.chars().count()).sum();
    assert!(reassembled >= text.chars().count());
}

#[test]
fn chunking_is_deterministic() {
    let text: String = "Experience with distributed systems. ".repeat(100);
    let cfg = ChunkingConfig::default();

    assert_eq!(chunk_text(&text, &cfg), chunk_text(&text, &cfg));
}

#[test]
fn chunk_count_matches_stride_arithmetic() {
    let cfg = config(100, 20);
    for len in [1usize, 99, 100, 101, 500, 1234] {
        let text: String = "x".repeat(len);
        let chunks = chunk_text(&text, &cfg);
        // one window per stride offset below the text length
        let expected = len.div_ceil(cfg.stride());
        assert_eq!(chunks.len(), expected, "length {}", len);
    }
}

#[test]
fn degenerate_stride_for_zero_window_is_safe() {
    assert!(chunk_text("anything", &config(0, 0)).is_empty());
}
