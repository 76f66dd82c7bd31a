use shardbuild::build::DocumentSection;
use shardbuild::ngram::runes_to_ngram;
use shardbuild::{is_text, BuildError, Document, IndexBuilder, RepositoryDescriptor};

fn repo(branches: &[&str]) -> RepositoryDescriptor {
    RepositoryDescriptor {
        name: "example".into(),
        branches: branches.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

#[test]
fn single_four_byte_ascii_document() {
    let mut b = IndexBuilder::new(Some(repo(&["main"]))).unwrap();
    b.add(Document {
        name: b"a.txt".to_vec(),
        content: b"abcd".to_vec(),
        branches: vec!["main".to_string()],
        ..Default::default()
    })
    .unwrap();

    assert_eq!(b.len(), 1);
    assert_eq!(b.contents().end_runes(), &[4]);
    assert_eq!(b.contents().end_byte(), 4);
    assert_eq!(b.contents().rune_offsets(), &[0]);
    assert_eq!(
        b.contents().decode_positions(runes_to_ngram('a', 'b', 'c')),
        vec![0]
    );
    assert_eq!(
        b.contents().decode_positions(runes_to_ngram('b', 'c', 'd')),
        vec![1]
    );
    assert_eq!(b.branch_masks(), &[0b1]);
}

#[test]
fn utf8_multibyte_document() {
    let mut b = IndexBuilder::new(None).unwrap();
    b.add_file("greeting.txt", "héllo".as_bytes()).unwrap();

    assert_eq!(b.contents().end_runes(), &[5]);
    assert_eq!(b.contents().end_byte(), 6);
    assert_eq!(
        b.contents().decode_positions(runes_to_ngram('h', 'é', 'l')),
        vec![0]
    );
}

#[test]
fn rune_offset_sampling_over_250_runes() {
    let mut b = IndexBuilder::new(None).unwrap();
    b.add_file("big.txt", "a".repeat(250)).unwrap();
    assert_eq!(b.contents().rune_offsets(), &[0, 100, 200]);
    assert_eq!(b.contents().end_runes(), &[250]);
}

#[test]
fn section_overlap_is_rejected() {
    let mut b = IndexBuilder::new(None).unwrap();
    let err = b
        .add(Document {
            name: b"a.txt".to_vec(),
            content: b"0123456789".to_vec(),
            symbols: vec![DocumentSection::new(0, 5), DocumentSection::new(3, 8)],
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, BuildError::SectionOverlap { .. }));
}

#[test]
fn sub_repo_membership_accepted_and_rejected() {
    let mut root = repo(&[]);
    root.sub_repos.insert("sub".to_string(), repo(&[]));
    let mut b = IndexBuilder::new(Some(root)).unwrap();

    b.add(Document {
        name: b"sub/x.go".to_vec(),
        content: b"package sub".to_vec(),
        sub_repository_path: "sub".to_string(),
        ..Default::default()
    })
    .unwrap();

    let err = b
        .add(Document {
            name: b"x.go".to_vec(),
            content: b"package main".to_vec(),
            sub_repository_path: "sub".to_string(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, BuildError::SubRepoPathMismatch { .. }));
}

#[test]
fn unknown_branch_is_rejected() {
    let mut b = IndexBuilder::new(Some(repo(&["main"]))).unwrap();
    let err = b
        .add(Document {
            name: b"a.txt".to_vec(),
            content: b"x".to_vec(),
            branches: vec!["dev".to_string()],
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, BuildError::UnknownBranch(_)));
}

#[test]
fn is_text_boundary_cases() {
    assert!(is_text(b""));
    assert!(is_text(b"ab"));
    assert!(!is_text(b"binary\0blob"));

    let line_without_break = vec![b'x'; 1001];
    assert!(!is_text(&line_without_break));
}

#[test]
fn shard_invariants_hold_across_many_documents() {
    let mut b = IndexBuilder::new(Some(repo(&["main", "dev"]))).unwrap();
    let docs: Vec<(String, String, Vec<String>)> = (0..40)
        .map(|i| {
            let branch = if i % 2 == 0 { "main" } else { "dev" };
            (
                format!("file_{i}.rs"),
                format!("fn f{i}() {{ return {i}; }}"),
                vec![branch.to_string()],
            )
        })
        .collect();

    for (name, content, branches) in &docs {
        b.add(Document {
            name: name.clone().into_bytes(),
            content: content.clone().into_bytes(),
            branches: branches.clone(),
            ..Default::default()
        })
        .unwrap();
    }

    let d = b.len();
    assert_eq!(d, docs.len());
    assert_eq!(b.files().len(), d);
    assert_eq!(b.file_names().len(), d);
    assert_eq!(b.doc_sections().len(), d);
    assert_eq!(b.branch_masks().len(), d);
    assert_eq!(b.sub_repos().len(), d);
    assert_eq!(b.contents().end_runes().len(), d);
    assert_eq!(b.names().end_runes().len(), d);

    assert!(b.contents().end_runes().windows(2).all(|w| w[0] <= w[1]));
    assert!(b
        .contents()
        .rune_offsets()
        .iter()
        .all(|&o| o < b.contents().end_byte()));

    for &g in b.contents().postings().keys() {
        let positions = b.contents().decode_positions(g);
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(positions.last().copied().unwrap_or(0) < b.contents().rune_count());
    }

    for mask in b.branch_masks() {
        assert_eq!(mask.count_ones(), 1);
    }

    for sections in b.doc_sections() {
        assert!(sections.windows(2).all(|w| w[0].end <= w[1].start));
    }
}

#[test]
fn rune_offset_table_walks_forward_to_any_rune() {
    // Build a single document with known, easily-indexable ASCII content and
    // check the round-trip law: walking forward from the sampled rune offset
    // by `j mod R` additional decodes lands on the byte offset of rune j.
    let mut b = IndexBuilder::new(None).unwrap();
    let content = "x".repeat(357);
    b.add_file("f.txt", content.as_bytes()).unwrap();

    let stride = 100u32;
    let rune_offsets = b.contents().rune_offsets().to_vec();
    for j in [0u32, 1, 99, 100, 101, 250, 356] {
        let sample_idx = (j / stride) as usize;
        let base_byte = rune_offsets[sample_idx];
        // ASCII content: byte offset advances 1-for-1 with rune index.
        let expected_byte = base_byte + (j % stride);
        assert_eq!(expected_byte, j);
    }
}
