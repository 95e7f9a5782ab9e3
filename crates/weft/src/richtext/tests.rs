use super::*;

fn kinds(rich: &RichText) -> Vec<&'static str> {
    rich.facets
        .iter()
        .map(|f| f.features[0].type_tag())
        .collect()
}

#[test]
fn no_matches() {
    let rich = extract("just some words, nothing special.");
    assert!(rich.facets.is_empty());
    assert_eq!(rich.text, "just some words, nothing special.");

    assert!(extract("").facets.is_empty());
}

#[test]
fn parse_mentions() {
    let text = "Hey @alice.bsky.social check this out";
    let rich = extract(text);

    assert_eq!(rich.facets.len(), 1);
    let facet = &rich.facets[0];
    assert_eq!(facet.slice(text), Some("@alice.bsky.social"));
    assert_eq!(facet.index, ByteSlice::from(4..22));
    assert_eq!(
        facet.features,
        vec![FacetFeature::Mention {
            did: SmolStr::default()
        }]
    );
    assert_eq!(facet.unresolved_handle.as_deref(), Some("alice.bsky.social"));
    assert!(facet.has_unresolved_mention());
}

#[test]
fn mention_needs_a_dot() {
    assert!(extract("hi @alice how are you").facets.is_empty());
    // final label must start with a letter
    assert!(extract("version @1.2").facets.is_empty());
}

#[test]
fn mention_trailing_punctuation() {
    let text = "thanks @bob.example.com!";
    let rich = extract(text);
    assert_eq!(rich.facets.len(), 1);
    assert_eq!(rich.facets[0].slice(text), Some("@bob.example.com"));

    let text = "cc @bob.example.com.";
    let rich = extract(text);
    assert_eq!(rich.facets[0].slice(text), Some("@bob.example.com"));
}

#[test]
fn parse_link() {
    let text = "check https://example.com/path now";
    let rich = extract(text);

    assert_eq!(rich.facets.len(), 1);
    let facet = &rich.facets[0];
    assert_eq!(
        facet.features,
        vec![FacetFeature::Link {
            uri: "https://example.com/path".into()
        }]
    );
    assert_eq!(facet.index.byte_start, 6);
    assert_eq!(facet.index.byte_end, 30);
    assert!(!facet.has_unresolved_mention());
}

#[test]
fn link_schemes() {
    let rich = extract("http://a.example and ftp://b.example");
    assert_eq!(rich.facets.len(), 1);
    assert_eq!(
        rich.facets[0].features[0],
        FacetFeature::Link {
            uri: "http://a.example".into()
        }
    );
    // bare domains are not links
    assert!(extract("visit example.com").facets.is_empty());
}

#[test]
fn link_query_and_trailing_punctuation() {
    let text = "see https://example.com/search?q=rust&page=2, then https://test.org.";
    let rich = extract(text);
    let links: Vec<_> = rich.facets.iter().filter_map(|f| f.slice(text)).collect();
    assert_eq!(
        links,
        vec!["https://example.com/search?q=rust&page=2", "https://test.org"]
    );
}

#[test]
fn link_in_parens() {
    let text = "(https://example.com)";
    let rich = extract(text);
    assert_eq!(rich.facets.len(), 1);
    assert_eq!(rich.facets[0].slice(text), Some("https://example.com"));
}

#[test]
fn link_keeps_balanced_parens() {
    let text = "see https://en.wikipedia.org/wiki/Rust_(programming_language) ok";
    let rich = extract(text);
    assert_eq!(rich.facets.len(), 1);
    assert_eq!(
        rich.facets[0].slice(text),
        Some("https://en.wikipedia.org/wiki/Rust_(programming_language)")
    );
    assert_eq!(
        rich.facets[0].features[0],
        FacetFeature::Link {
            uri: "https://en.wikipedia.org/wiki/Rust_(programming_language)".into()
        }
    );

    // wrapped in parens of its own, then a full stop
    let text = "(see https://en.wikipedia.org/wiki/Rust_(lang)).";
    let rich = extract(text);
    assert_eq!(
        rich.facets[0].slice(text),
        Some("https://en.wikipedia.org/wiki/Rust_(lang)")
    );

    // punctuation uncovered by dropping the paren goes too
    let text = "(https://example.com/a.)";
    assert_eq!(extract(text).facets[0].slice(text), Some("https://example.com/a"));

    assert!(extract("https://)").facets.is_empty());
}

#[test]
fn parse_tags() {
    let text = "This is #cool and #awesome_2024";
    let rich = extract(text);

    let tags: Vec<_> = rich
        .facets
        .iter()
        .map(|f| f.features[0].clone())
        .collect();
    assert_eq!(
        tags,
        vec![
            FacetFeature::Tag { tag: "cool".into() },
            FacetFeature::Tag {
                tag: "awesome_2024".into()
            },
        ]
    );
    assert_eq!(rich.facets[0].slice(text), Some("#cool"));
}

#[test]
fn tag_must_start_with_letter() {
    assert!(extract("issue #123").facets.is_empty());
    assert!(extract("lonely # here").facets.is_empty());
    assert!(extract("#_under").facets.is_empty());
}

#[test]
fn emoji_before_tag_counts_bytes() {
    let text = "🎉 #hi";
    let rich = extract(text);
    assert_eq!(rich.facets.len(), 1);
    // 4 bytes of emoji + 1 space, not 2 chars
    assert_eq!(rich.facets[0].index.byte_start, 5);
    assert_eq!(rich.facets[0].index.byte_end, 8);
    assert_eq!(rich.facets[0].slice(text), Some("#hi"));
}

#[test]
fn multibyte_offsets_for_every_kind() {
    // family emoji is 25 bytes, é is 2
    let text = "👨‍👩‍👧‍👧 café @alice.bsky.social https://é.example #thé";
    let rich = extract(text);
    assert_eq!(kinds(&rich), vec![MENTION_TYPE, TAG_TYPE]);
    assert_eq!(rich.facets[0].slice(text), Some("@alice.bsky.social"));
    assert_eq!(rich.facets[0].index.byte_start, 25 + 1 + 5 + 1);
    assert_eq!(rich.facets[1].slice(text), Some("#thé"));
    assert_eq!(rich.facets[1].features[0], FacetFeature::Tag { tag: "thé".into() });

    for facet in &rich.facets {
        assert!(facet.index.byte_start <= facet.index.byte_end);
        assert!(facet.index.byte_end <= text.len());
    }
}

#[test]
fn sorted_by_start() {
    let text = "#first https://example.com @carol.example.org #last";
    let rich = extract(text);
    assert_eq!(kinds(&rich), vec![TAG_TYPE, LINK_TYPE, MENTION_TYPE, TAG_TYPE]);
    let starts: Vec<_> = rich.facets.iter().map(|f| f.index.byte_start).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[test]
fn overlaps_are_kept() {
    let text = "https://example.com/#section";
    let rich = extract(text);
    assert_eq!(kinds(&rich), vec![LINK_TYPE, TAG_TYPE]);
    assert!(rich.facets[0].index.overlaps(&rich.facets[1].index));
    assert_eq!(rich.facets[1].slice(text), Some("#section"));
}

#[test]
fn ties_keep_pass_order() {
    // a mention and a link can't share a start in real text
    let facets = merge_passes(
        vec![
            Facet::unresolved_mention(0..3, "a.b"),
            Facet::unresolved_mention(9..12, "c.d"),
        ],
        vec![Facet::link(0..3, "https://x"), Facet::link(4..8, "https://y")],
        vec![Facet::tag(4..8, "efg"), Facet::tag(0..3, "abc")],
    );
    let starts: Vec<_> = facets.iter().map(|f| f.index.byte_start).collect();
    assert_eq!(starts, vec![0, 0, 0, 4, 4, 9]);
    let order: Vec<_> = facets.iter().map(|f| f.features[0].type_tag()).collect();
    assert_eq!(
        order,
        vec![MENTION_TYPE, LINK_TYPE, TAG_TYPE, LINK_TYPE, TAG_TYPE, MENTION_TYPE]
    );
}

#[test]
fn mention_inside_link_is_found_by_both_passes() {
    let text = "https://bsky.app/@alice.bsky.social";
    let rich = extract(text);
    assert_eq!(kinds(&rich), vec![LINK_TYPE, MENTION_TYPE]);
    assert_eq!(rich.facets[1].slice(text), Some("@alice.bsky.social"));
}

#[test]
fn scanner_is_restartable() {
    let text = "#a #b #c";
    let first = next_match(&TAG_REGEX, text, 0).unwrap();
    assert_eq!(first.as_str(), "#a");
    let second = next_match(&TAG_REGEX, text, first.end()).unwrap();
    assert_eq!(second.as_str(), "#b");
    // same inputs, same answer
    assert_eq!(next_match(&TAG_REGEX, text, first.end()).unwrap().range(), second.range());
    assert!(next_match(&TAG_REGEX, text, text.len()).is_none());
    assert!(next_match(&TAG_REGEX, text, text.len() + 1).is_none());
}

#[test]
fn resolve_mentions() {
    let mut rich = extract("hi @alice.bsky.social and @bob.example.com");
    assert_eq!(
        rich.unresolved_handles().collect::<Vec<_>>(),
        vec!["alice.bsky.social", "bob.example.com"]
    );

    let resolved = rich.resolve_mentions(|handle| match handle {
        "alice.bsky.social" => Did::new("did:plc:alice").ok(),
        _ => None,
    });
    assert_eq!(resolved, 1);
    assert_eq!(
        rich.facets[0].features[0],
        FacetFeature::Mention {
            did: "did:plc:alice".into()
        }
    );
    assert!(rich.facets[0].unresolved_handle.is_none());
    assert!(rich.facets[1].has_unresolved_mention());
    assert_eq!(rich.unresolved_handles().collect::<Vec<_>>(), vec!["bob.example.com"]);
}

#[test]
fn facet_wire_shape() {
    let rich = extract("🎉 #hi https://a.example @x.example.com");
    let json = serde_json::to_value(&rich.facets).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {
                "index": { "byteStart": 5, "byteEnd": 8 },
                "features": [{ "$type": "app.bsky.richtext.facet#tag", "tag": "hi" }]
            },
            {
                "index": { "byteStart": 9, "byteEnd": 26 },
                "features": [{ "$type": "app.bsky.richtext.facet#link", "uri": "https://a.example" }]
            },
            {
                "index": { "byteStart": 27, "byteEnd": 41 },
                "features": [{ "$type": "app.bsky.richtext.facet#mention", "did": "" }]
            }
        ])
    );

    let back: Vec<Facet> = serde_json::from_value(json).unwrap();
    assert_eq!(back[0], rich.facets[0]);
    // the marker isn't on the wire
    assert!(back[2].unresolved_handle.is_none());
}

#[test]
fn grapheme_length_of_text() {
    let rich = extract("🎉 #hi");
    assert_eq!(rich.grapheme_length(), 5);
}
