//! # Huffman coding with a readable code table
//!
//! Static (two pass) Huffman coding of text, where each byte is a symbol.
//! The encoded file starts with the code table in plain text, bounded by `*TBL*` lines,
//! followed by the packed bits.  This is the format of a legacy teaching tool, and the
//! tree construction reproduces its tie-breaking exactly, so that identical input gives
//! byte-identical output.
//!
//! * `frequency` counts symbols
//! * `tree` builds the code tree by greedy merging
//! * `code_table` derives, writes, and parses the code table
//! * `huffman` is the session that encodes and decodes streams
//!
//! Example:
//! ```
//! use huffcoder::{huffman,STD_OPTIONS};
//! let compressed = huffman::compress_slice(b"aaaabbbb",&STD_OPTIONS).expect("compression failed");
//! assert!(compressed.starts_with(b"*TBL*\n"));
//! let expanded = huffman::expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
//! assert_eq!(expanded,b"aaaabbbb".to_vec());
//! ```

mod tools;
pub mod frequency;
pub mod tree;
pub mod code_table;
pub mod huffman;

type DYNERR = Box<dyn std::error::Error>;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

/// Codec Errors
#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("could not find an encoding table")]
    MissingTable,
    #[error("encoding table is not terminated")]
    UnterminatedTable,
    #[error("bad encoding table entry `{0}`")]
    BadTableEntry(String),
    #[error("NotFound: byte {0:#04x} is not in the encoding table")]
    UnknownSymbol(u8),
    #[error("bit string contains {0:?}")]
    InvalidBitString(char),
    #[error("{0} trailing bits do not complete a code")]
    DanglingBits(usize)
}

/// How a final group of fewer than 8 bits is packed into a byte.
/// The file carries no padding information, so neither choice is lossless in general.
#[derive(Clone,Copy,PartialEq,Debug)]
pub enum Tail {
    /// The partial group is read as a binary number, i.e., it lands in the low bits.
    /// This is what the legacy tool produces.
    RightAligned,
    /// The partial group keeps the high bits, low bits are zero.
    ZeroFilled
}

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// packing of the final partial byte
    pub tail: Tail,
    /// if true, trailing bits that do not complete a code are an error on decode
    pub strict: bool
}

pub const STD_OPTIONS: Options = Options {
    tail: Tail::RightAligned,
    strict: false
};
