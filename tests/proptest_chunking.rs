//! Property-based tests using proptest.
//!
//! The parser must report the same records and the same content no matter
//! how the archive bytes are split across `feed` calls.

mod common;

use common::{ArchiveBuilder, parse_in_chunks, parse_split, sample_text};
use proptest::prelude::*;
use zipstream::StreamParser;

/// Archive mixing stored, deflated and descriptor-terminated entries.
fn mixed_archive() -> Vec<u8> {
    ArchiveBuilder::new()
        .stored("readme.txt", b"streamed zip fixture\n")
        .deflated("data/large.bin", &sample_text(20_000))
        .deflated_with_descriptor("data/log.txt", &sample_text(700))
        .stored("data/", b"")
        .deflated("empty.txt", b"")
        .comment("proptest")
        .build()
}

/// Entries as (name, payload, deflated, with descriptor).
fn entry_strategy() -> impl Strategy<Value = Vec<(String, Vec<u8>, bool, bool)>> {
    proptest::collection::vec(
        (
            "[a-z]{1,8}(/[a-z]{1,8})?",
            proptest::collection::vec(any::<u8>(), 0..600),
            any::<bool>(),
            any::<bool>(),
        ),
        0..5,
    )
}

proptest! {
    /// Any set of split points yields the same merged events as one feed.
    #[test]
    fn split_points_do_not_change_events(
        splits in proptest::collection::vec(any::<prop::sample::Index>(), 0..24)
    ) {
        let archive = mixed_archive();
        let whole = parse_in_chunks(&archive, usize::MAX).unwrap();

        let mut offsets: Vec<usize> = splits.iter().map(|i| i.index(archive.len())).collect();
        offsets.sort_unstable();

        let recorder = parse_split(&archive, &offsets).unwrap();
        prop_assert_eq!(recorder.merged(), whole.merged());
    }

    /// Fixed chunk sizes deliver the entries byte for byte.
    #[test]
    fn generated_archives_round_trip(
        entries in entry_strategy(),
        chunk_size in 1usize..300,
    ) {
        let mut builder = ArchiveBuilder::new();
        for (name, data, deflated, descriptor) in &entries {
            builder = match (deflated, descriptor) {
                (_, true) => builder.deflated_with_descriptor(name, data),
                (true, false) => builder.deflated(name, data),
                (false, false) => builder.stored(name, data),
            };
        }
        let archive = builder.build();

        let recorder = parse_in_chunks(&archive, chunk_size).unwrap();

        for (name, ..) in &entries {
            // Names may repeat; content is compared against the concatenation.
            let expected: Vec<u8> = entries
                .iter()
                .filter(|(other, ..)| other == name)
                .flat_map(|(_, bytes, ..)| bytes.iter().copied())
                .collect();
            prop_assert_eq!(recorder.content_of(name), expected);
        }
    }

    /// Arbitrary bytes either parse, fail cleanly, or wait for more input.
    #[test]
    fn arbitrary_input_never_panics(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        chunk_size in 1usize..64,
    ) {
        let mut parser = StreamParser::new(());
        for chunk in data.chunks(chunk_size) {
            if parser.feed(chunk).is_err() {
                break;
            }
        }
        let _ = parser.finish();
    }
}
