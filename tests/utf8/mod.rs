//! UTF-8 safety tests
//!
//! Segmentation and ingestion of emojis, multi-byte characters and
//! mixed content. Offsets are char indices, so no section may split
//! a UTF-8 sequence.

mod test_mixed;
