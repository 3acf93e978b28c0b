//! Property-based tests for record assembly and the last-accessed marker.

use keebook::services::record_writer::{
    build_record, tags_for, update_last_accessed_marker, BOOKMARK_TAG, CUSTOM_ICON_TAG,
    SECURE_URL_TAG,
};
use keebook::store::{MemoryVault, VaultStore};
use keebook::types::record::{IconRef, LAST_ACCESSED_TITLE};
use proptest::prelude::*;
use uuid::Uuid;

/// Strategy for generating valid URL strings.
/// Produces URLs with http/https scheme, alphanumeric host, and optional path.
fn arb_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9]{2,15}",
        prop_oneof![Just(".com"), Just(".org"), Just(".net"), Just(".io")],
        proptest::option::of("/[a-z0-9]{1,10}"),
    )
        .prop_map(|(scheme, host, tld, path)| {
            format!("{}://{}{}{}", scheme, host, tld, path.unwrap_or_default())
        })
}

/// Strategy for generating non-empty record titles.
fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{1,30}"
}

fn arb_icon() -> impl Strategy<Value = IconRef> {
    prop_oneof![
        Just(IconRef::Default),
        any::<u128>().prop_map(|n| IconRef::Cached(Uuid::from_u128(n))),
    ]
}

// Property: the tag set is fully determined by the url scheme and the
// icon kind. Every record carries the bookmark tag; the secure tag
// appears exactly for https urls; the custom-icon tag exactly for
// cached icons.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn tags_are_deterministic(url in arb_url(), icon in arb_icon()) {
        let tags = tags_for(&url, &icon);

        prop_assert!(tags.contains(&BOOKMARK_TAG.to_string()));
        prop_assert_eq!(
            tags.contains(&SECURE_URL_TAG.to_string()),
            url.starts_with("https://")
        );
        prop_assert_eq!(
            tags.contains(&CUSTOM_ICON_TAG.to_string()),
            icon.is_custom()
        );
        // Recomputing yields the same set.
        prop_assert_eq!(tags, tags_for(&url, &icon));
    }

    #[test]
    fn built_record_preserves_inputs(
        title in arb_title(),
        url in arb_url(),
        write_note in any::<bool>(),
    ) {
        let record = build_record(&title, &url, IconRef::Default, write_note);

        prop_assert_eq!(&record.title, &title);
        prop_assert_eq!(&record.url, &url);
        prop_assert_eq!(record.note.is_some(), write_note);
        prop_assert_eq!(record.created_at, record.updated_at);
    }

    // Property: after any sequence of marker updates exactly one marker
    // record exists, and its note lists the titles in order.
    #[test]
    fn marker_note_lists_titles_in_order(
        titles in proptest::collection::vec(arb_title(), 1..8),
    ) {
        let mut vault = MemoryVault::new();
        let group = vault.find_or_create_group("g").unwrap();

        for title in &titles {
            update_last_accessed_marker(&mut vault, &group, title).unwrap();
        }

        let markers: Vec<_> = vault
            .list_records(&group)
            .unwrap()
            .into_iter()
            .filter(|r| r.title == LAST_ACCESSED_TITLE)
            .collect();
        prop_assert_eq!(markers.len(), 1);

        let note = markers[0].note.clone().unwrap();
        let lines: Vec<&str> = note.lines().collect();
        let expected: Vec<&str> = titles.iter().map(String::as_str).collect();
        prop_assert_eq!(lines, expected);
    }
}
