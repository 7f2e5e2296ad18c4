//! Helpers that are not specific to the code table format

pub mod bit_string;
