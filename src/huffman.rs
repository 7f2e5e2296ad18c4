//! Static Huffman coding of text
//!
//! A `Huffman` session is built from the whole text (frequency table, code tree, encoding
//! table), or left empty and filled in from the header of an encoded file.  Encoding
//! writes the code table in plain text followed by the packed bits.
//!
//! * The payload has no length or padding information.  If the number of code bits is
//!   not a multiple of 8, the last byte is packed according to `Options::tail`, and
//!   decoding may produce extra symbols or lose the last one.
//! * Bits left over at the end of decoding are dropped, unless `Options::strict` is set.

use std::io::{Cursor,Read,Write,Seek};
use crate::frequency::{FrequencyTable,display_key};
use crate::tree::{CodeTree,TreeNode};
use crate::code_table::EncodingTable;
use crate::tools::bit_string::{bytes_to_bit_string,bit_string_to_bytes};
use crate::{DYNERR,STDRESULT};

/// What `character_code` returns for a symbol that is not in the table
pub const NOT_FOUND: &str = "NotFound";

#[derive(Clone,Debug,Default)]
pub struct Huffman {
    frequency: FrequencyTable,
    tree: CodeTree,
    encoding: EncodingTable
}

impl Huffman {
    /// Empty session, use this to decode
    pub fn new() -> Self {
        Self::default()
    }
    /// Session with all tables built from `text`, use this to encode
    pub fn from_text(text: &[u8]) -> Self {
        let mut ans = Self::new();
        ans.build_tables(text);
        ans
    }
    /// Build the frequency table, code tree, and encoding table, replacing any prior tables
    pub fn build_tables(&mut self,text: &[u8]) {
        self.frequency = FrequencyTable::from_text(text);
        self.tree = CodeTree::build(&self.frequency);
        self.encoding = EncodingTable::derive(&self.frequency,&self.tree);
    }
    pub fn frequency_table(&self) -> &FrequencyTable {
        &self.frequency
    }
    pub fn encoding_table(&self) -> &EncodingTable {
        &self.encoding
    }
    pub fn tree(&self) -> &CodeTree {
        &self.tree
    }
    /// Visit every tree node, children before parents
    pub fn post_order<F>(&self,callback: F) where F: FnMut(&TreeNode) {
        self.tree.post_order(callback);
    }
    pub fn print_frequency_table<W: Write>(&self,out: &mut W) -> STDRESULT {
        for e in self.frequency.entries() {
            let key = match e.key.first() {
                Some(c) => padded_key(*c),
                None => continue
            };
            out.write_all(b"{element:")?;
            out.write_all(&key)?;
            writeln!(out,", frequency: {}}}",e.frequency)?;
        }
        Ok(())
    }
    pub fn print_encoding_table<W: Write>(&self,out: &mut W) -> STDRESULT {
        for e in self.encoding.entries() {
            out.write_all(b"{key:")?;
            out.write_all(&padded_key(e.character))?;
            writeln!(out,", code: {}}}",e.code)?;
        }
        Ok(())
    }
    /// Code for a symbol, or `NOT_FOUND` if the symbol is not in the table
    pub fn character_code(&self,c: u8) -> &str {
        self.encoding.code(c).unwrap_or(NOT_FOUND)
    }
    /// Concatenate the codes for every symbol in `text`
    pub fn encode_bits(&self,text: &[u8]) -> Result<String,crate::Error> {
        let mut ans = String::new();
        for c in text {
            match self.encoding.code(*c) {
                Some(code) => ans += code,
                None => return Err(crate::Error::UnknownSymbol(*c))
            }
        }
        Ok(ans)
    }
    /// Turn a bit string back into symbols, using the current encoding table.
    /// Returns the symbols and the number of trailing bits that did not complete a code.
    pub fn decode_bits(&self,bits: &str) -> (Vec<u8>,usize) {
        let lookup = self.encoding.reverse();
        let mut ans = Vec::new();
        let mut code = String::new();
        for bit in bits.chars() {
            code.push(bit);
            if let Some(c) = lookup.get(code.as_str()) {
                ans.push(*c);
                code.clear();
            }
        }
        (ans,code.len())
    }
    /// Write the table and the encoded `text`.  Every symbol in `text` must be in the table.
    /// Returns the number of bytes in the table entries plus the number of payload bytes,
    /// the marker lines are not counted.
    pub fn write_encoded<W: Write>(&self,text: &[u8],out: &mut W,opt: &crate::Options) -> Result<usize,DYNERR> {
        let bits = self.encode_bits(text)?;
        let table_bytes = self.encoding.write_to(out)?;
        log::debug!("{} code bits for {} symbols",bits.len(),text.len());
        if bits.len() % 8 > 0 {
            log::debug!("final byte holds {} bits",bits.len() % 8);
        }
        let payload = bit_string_to_bytes(&bits,opt.tail)?;
        out.write_all(&payload)?;
        out.flush()?;
        Ok(table_bytes + payload.len())
    }
    /// Parse the table from `encoded`, replacing the current encoding table, then decode the
    /// payload into `out`.  Returns the number of decoded bytes.
    /// The frequency table and tree cannot be recovered from the header, so they are cleared.
    pub fn write_decoded<W: Write>(&mut self,encoded: &[u8],out: &mut W,opt: &crate::Options) -> Result<usize,DYNERR> {
        let (table,ptr) = EncodingTable::parse(encoded)?;
        self.frequency = FrequencyTable::default();
        self.tree = CodeTree::default();
        self.encoding = table;
        let bits = bytes_to_bit_string(&encoded[ptr..]);
        let (text,dangling) = self.decode_bits(&bits);
        if dangling > 0 {
            if opt.strict {
                log::debug!("rejecting {} bits at the end",dangling);
                return Err(Box::new(crate::Error::DanglingBits(dangling)));
            }
            log::warn!("dropping {} bits at the end",dangling);
        }
        out.write_all(&text)?;
        out.flush()?;
        Ok(text.len())
    }
}

/// Symbol as printed in the tables, right aligned in 3 columns.
/// Bytes are written as they are, not converted to UTF-8.
fn padded_key(symbol: u8) -> Vec<u8> {
    let key = display_key(symbol);
    let pad = 3usize.saturating_sub(key.len());
    [vec![b' ';pad],key].concat()
}

/// Encode the whole of `expanded_in`, writing table and payload to `compressed_out`.
/// Returns the number of bytes read and written.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &crate::Options) -> Result<(u64,u64),DYNERR>
where R: Read, W: Write + Seek {
    let start = compressed_out.stream_position()?;
    let mut text = Vec::new();
    expanded_in.read_to_end(&mut text)?;
    let huff = Huffman::from_text(&text);
    huff.write_encoded(&text,compressed_out,opt)?;
    Ok((text.len() as u64,compressed_out.stream_position()? - start))
}

/// Decode the whole of `compressed_in` to `expanded_out`.
/// Returns the number of bytes read and written.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &crate::Options) -> Result<(u64,u64),DYNERR>
where R: Read, W: Write + Seek {
    let start = expanded_out.stream_position()?;
    let mut encoded = Vec::new();
    compressed_in.read_to_end(&mut encoded)?;
    let mut huff = Huffman::new();
    huff.write_decoded(&encoded,expanded_out,opt)?;
    Ok((encoded.len() as u64,expanded_out.stream_position()? - start))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &crate::Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &crate::Options) -> Result<Vec<u8>,DYNERR> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

// *************** TESTS *****************

#[test]
fn compression_works() {
    let compressed = compress_slice("aaaabbbb".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let expected = ["*TBL*\nb 0\na 1\n*TBL*\n".as_bytes().to_vec(),hex::decode("F0").unwrap()].concat();
    assert_eq!(compressed,expected);

    let compressed = compress_slice("x \r\n".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let expected = ["*TBL*\nx 00\nSP 01\nLF 10\nCR 11\n*TBL*\n".as_bytes().to_vec(),hex::decode("1B").unwrap()].concat();
    assert_eq!(compressed,expected);
}

#[test]
fn compression_partial_byte() {
    // 23 code bits, the last 7 land in the low bits by default
    let compressed = compress_slice("abracadabra".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let expected = ["*TBL*\na 1\nr 01\nb 001\nd 0000\nc 0001\n*TBL*\n".as_bytes().to_vec(),hex::decode("96304B").unwrap()].concat();
    assert_eq!(compressed,expected);

    let mut opt = crate::STD_OPTIONS;
    opt.tail = crate::Tail::ZeroFilled;
    let compressed = compress_slice("abracadabra".as_bytes(),&opt).expect("compression failed");
    assert!(compressed.ends_with(&hex::decode("963096").unwrap()));
}

#[test]
fn invertibility() {
    let test_data = "aaaabbbb".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);

    let test_data = "x \r\n".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn invertibility_with_zero_fill() {
    // zero fill leaves 1 bit that does not complete a code, this gets dropped
    let mut opt = crate::STD_OPTIONS;
    opt.tail = crate::Tail::ZeroFilled;
    let test_data = "abracadabra".as_bytes();
    let compressed = compress_slice(test_data,&opt).expect("compression failed");
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
    opt.strict = true;
    match expand_slice(&compressed,&opt) {
        Ok(_) => panic!("dangling bits were accepted"),
        Err(e) => assert_eq!(e.to_string(),"1 trailing bits do not complete a code")
    }
}

#[test]
fn right_aligned_tail_misaligns() {
    // the last 7 bits are read back as 8 bits with a leading zero
    let compressed = compress_slice("abracadabra".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(expanded,"abracadrbra".as_bytes().to_vec());
}

#[test]
fn empty_text() {
    let huff = Huffman::from_text(&[]);
    assert!(huff.frequency_table().is_empty());
    assert!(huff.encoding_table().is_empty());
    let compressed = compress_slice(&[],&crate::STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,"*TBL*\n*TBL*\n".as_bytes().to_vec());
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert!(expanded.is_empty());
}

#[test]
fn single_symbol() {
    let huff = Huffman::from_text("zzzz".as_bytes());
    assert_eq!(huff.tree().len(),1);
    assert_eq!(huff.character_code(b'z'),"0");
    // 8 symbols fill exactly one byte
    let test_data = "zzzzzzzz".as_bytes();
    let compressed = compress_slice(test_data,&crate::STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,[b"*TBL*\nz 0\n*TBL*\n".to_vec(),vec![0]].concat());
    let expanded = expand_slice(&compressed,&crate::STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn missing_table() {
    match expand_slice("no table here\n".as_bytes(),&crate::STD_OPTIONS) {
        Ok(_) => panic!("expanded without a table"),
        Err(e) => assert_eq!(e.to_string(),"could not find an encoding table")
    }
}

#[test]
fn unknown_symbol() {
    let huff = Huffman::from_text("aaab".as_bytes());
    assert_eq!(huff.character_code(b'c'),NOT_FOUND);
    let mut out: Vec<u8> = Vec::new();
    match huff.write_encoded("abc".as_bytes(),&mut out,&crate::STD_OPTIONS) {
        Ok(_) => panic!("encoded an unknown symbol"),
        Err(e) => assert!(e.to_string().starts_with("NotFound"))
    }
}

#[test]
fn bytes_written() {
    let huff = Huffman::from_text("aaab".as_bytes());
    let mut out: Vec<u8> = Vec::new();
    let count = huff.write_encoded("aaab".as_bytes(),&mut out,&crate::STD_OPTIONS).expect("encoding failed");
    // two table rows of 4 bytes and one payload byte
    assert_eq!(count,9);
    assert_eq!(out.len(),9+12);
    assert_eq!(out[out.len()-1],0x01);
}

#[test]
fn print_tables() {
    let huff = Huffman::from_text("aab\n".as_bytes());
    let mut out: Vec<u8> = Vec::new();
    huff.print_frequency_table(&mut out).expect("print failed");
    assert_eq!(String::from_utf8(out).unwrap(),
        "{element:  a, frequency: 2}\n{element:  b, frequency: 1}\n{element: CR, frequency: 1}\n");
    let mut out: Vec<u8> = Vec::new();
    huff.print_encoding_table(&mut out).expect("print failed");
    assert_eq!(String::from_utf8(out).unwrap(),
        "{key:  a, code: 1}\n{key:  b, code: 00}\n{key: CR, code: 01}\n");
}

#[test]
fn frequencies_sum_to_length() {
    let text = "It is a truth universally acknowledged, that a single man in possession of a good fortune, must be in want of a wife.\n".as_bytes();
    let huff = Huffman::from_text(text);
    assert_eq!(huff.frequency_table().total(),text.len());
    let mut leaves = 0;
    huff.post_order(|n| if n.is_leaf() { leaves += 1 });
    assert_eq!(leaves,huff.encoding_table().len());
}

#[test]
fn decode_replaces_table() {
    let compressed = compress_slice("aaaabbbb".as_bytes(),&crate::STD_OPTIONS).expect("compression failed");
    let mut huff = Huffman::from_text("xyz".as_bytes());
    let mut out: Vec<u8> = Vec::new();
    let count = huff.write_decoded(&compressed,&mut out,&crate::STD_OPTIONS).expect("decoding failed");
    assert_eq!(count,8);
    assert_eq!(out,"aaaabbbb".as_bytes().to_vec());
    assert_eq!(huff.character_code(b'x'),NOT_FOUND);
    assert_eq!(huff.character_code(b'b'),"0");
    // nothing left over from the text the session was built with
    assert!(huff.frequency_table().is_empty());
    assert!(huff.tree().is_empty());
    let mut leaves = 0;
    huff.post_order(|_| leaves += 1);
    assert_eq!(leaves,0);
}

#[test]
fn print_raw_bytes() {
    let huff = Huffman::from_text(&[0xe9,0xe9,b'\r']);
    let mut out: Vec<u8> = Vec::new();
    huff.print_frequency_table(&mut out).expect("print failed");
    let expected = [b"{element:  ".to_vec(),vec![0xe9],b", frequency: 2}\n{element: LF, frequency: 1}\n".to_vec()].concat();
    assert_eq!(out,expected);
    let mut out: Vec<u8> = Vec::new();
    huff.print_encoding_table(&mut out).expect("print failed");
    let expected = [b"{key:  ".to_vec(),vec![0xe9],b", code: 0}\n{key: LF, code: 1}\n".to_vec()].concat();
    assert_eq!(out,expected);
}
