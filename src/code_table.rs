//! Encoding table, mapping each symbol to its code.
//!
//! The table is either derived from a code tree (when encoding) or parsed from the
//! header of an encoded file (when decoding).  The header looks like this:
//! ```text
//! *TBL*
//! a 1
//! SP 01
//! CR 001
//! *TBL*
//! ```
//! Newline is written as `CR`, carriage return as `LF`, and space as `SP`.
//! The labels for newline and carriage return are swapped relative to convention,
//! files written by the legacy tool depend on this.

use std::collections::HashMap;
use std::io::Write;
use crate::frequency::FrequencyTable;
use crate::tree::CodeTree;
use crate::Error;

/// Literal line that opens the table
pub const TABLE_START: &str = "*TBL*";
/// Literal line that closes the table, same as the opening line
pub const TABLE_END: &str = "*TBL*";

#[derive(Clone,Debug,PartialEq)]
pub struct CodeTableEntry {
    pub character: u8,
    pub code: String
}

#[derive(Clone,Debug,Default)]
pub struct EncodingTable {
    entries: Vec<CodeTableEntry>,
    slot: HashMap<u8,usize>
}

/// Token used for a symbol in the table header
pub fn symbol_token(symbol: u8) -> Vec<u8> {
    match symbol {
        b'\n' => b"CR".to_vec(),
        b'\r' => b"LF".to_vec(),
        b' ' => b"SP".to_vec(),
        c => vec![c]
    }
}

/// Inverse of `symbol_token`, returns None if the token is not valid
pub fn token_symbol(token: &[u8]) -> Option<u8> {
    match token {
        b"CR" => Some(b'\n'),
        b"LF" => Some(b'\r'),
        b"SP" => Some(b' '),
        [c] => Some(*c),
        _ => None
    }
}

impl EncodingTable {
    /// Derive the codes from the tree, in the order of the frequency table
    pub fn derive(table: &FrequencyTable,tree: &CodeTree) -> Self {
        let mut paths = tree.paths();
        let mut ans = Self::default();
        for e in table.entries() {
            if let Some(symbol) = e.key.first() {
                if let Some(code) = paths.remove(symbol) {
                    log::trace!("code for {:?} is {}",char::from(*symbol),code);
                    ans.push(*symbol,code);
                }
            }
        }
        ans
    }
    fn push(&mut self,character: u8,code: String) {
        // first entry wins if a parsed table repeats a symbol
        self.slot.entry(character).or_insert(self.entries.len());
        self.entries.push(CodeTableEntry {
            character,
            code
        });
    }
    pub fn entries(&self) -> &[CodeTableEntry] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn code(&self,character: u8) -> Option<&str> {
        self.slot.get(&character).map(|i| self.entries[*i].code.as_str())
    }
    /// Map from code back to symbol, for decoding
    pub fn reverse(&self) -> HashMap<&str,u8> {
        let mut ans = HashMap::new();
        for e in &self.entries {
            ans.entry(e.code.as_str()).or_insert(e.character);
        }
        ans
    }
    /// Write the table including the markers.
    /// Returns the number of bytes in the entry lines, markers are not counted.
    pub fn write_to<W: Write>(&self,writer: &mut W) -> Result<usize,std::io::Error> {
        let mut row_bytes = 0;
        writeln!(writer,"{}",TABLE_START)?;
        for e in &self.entries {
            let line = [symbol_token(e.character),b" ".to_vec(),e.code.as_bytes().to_vec(),b"\n".to_vec()].concat();
            writer.write_all(&line)?;
            row_bytes += line.len();
        }
        writeln!(writer,"{}",TABLE_END)?;
        Ok(row_bytes)
    }
    /// Parse a table from the start of `buf`.
    /// Returns the table and the offset where the payload starts.
    pub fn parse(buf: &[u8]) -> Result<(Self,usize),Error> {
        let mut ans = Self::default();
        let mut ptr = 0;
        match next_line(buf,&mut ptr) {
            Some(line) if line==TABLE_START.as_bytes() => {},
            _ => {
                log::debug!("no {} line at the start",TABLE_START);
                return Err(Error::MissingTable);
            }
        }
        loop {
            let line = match next_line(buf,&mut ptr) {
                Some(line) => line,
                None => return Err(Error::UnterminatedTable)
            };
            if line==TABLE_END.as_bytes() {
                break;
            }
            let bad_entry = || Error::BadTableEntry(String::from_utf8_lossy(line).to_string());
            let split = line.iter().rposition(|c| *c==b' ').ok_or_else(bad_entry)?;
            let character = token_symbol(&line[0..split]).ok_or_else(bad_entry)?;
            let code = &line[split+1..];
            if code.is_empty() || code.iter().any(|c| *c!=b'0' && *c!=b'1') {
                return Err(bad_entry());
            }
            // code is ASCII, checked above
            ans.push(character,String::from_utf8_lossy(code).to_string());
        }
        log::debug!("parsed encoding table with {} entries",ans.len());
        Ok((ans,ptr))
    }
}

/// Get the bytes up to the next newline, and advance `ptr` past the newline.
/// Returns None if there is no newline.
fn next_line<'a>(buf: &'a [u8],ptr: &mut usize) -> Option<&'a [u8]> {
    let rest = &buf[*ptr..];
    let end = rest.iter().position(|c| *c==b'\n')?;
    *ptr += end + 1;
    Some(&rest[0..end])
}

#[test]
fn derive_works() {
    let freq = FrequencyTable::from_text("abracadabra".as_bytes());
    let table = EncodingTable::derive(&freq,&CodeTree::build(&freq));
    let actual: Vec<(u8,&str)> = table.entries().iter().map(|e| (e.character,e.code.as_str())).collect();
    assert_eq!(actual,vec![(b'a',"1"),(b'r',"01"),(b'b',"001"),(b'd',"0000"),(b'c',"0001")]);
    assert_eq!(table.code(b'c'),Some("0001"));
    assert_eq!(table.code(b'z'),None);
}

#[test]
fn prefix_free() {
    let text = "Now is the winter of our discontent\nMade glorious summer by this sun of York;\n".as_bytes();
    let freq = FrequencyTable::from_text(text);
    let table = EncodingTable::derive(&freq,&CodeTree::build(&freq));
    assert_eq!(table.len(),freq.len());
    for a in table.entries() {
        assert!(!a.code.is_empty());
        for b in table.entries() {
            if a.character!=b.character {
                assert!(!b.code.starts_with(&a.code),"{} is a prefix of {}",a.code,b.code);
            }
        }
    }
}

#[test]
fn frequent_symbols_get_short_codes() {
    let freq = FrequencyTable::from_text("aaab".as_bytes());
    let table = EncodingTable::derive(&freq,&CodeTree::build(&freq));
    let a = table.code(b'a').expect("no code for a");
    let b = table.code(b'b').expect("no code for b");
    assert!(a.len() <= b.len());
    assert_eq!((a,b),("0","1"));
}

#[test]
fn write_tokens() {
    let freq = FrequencyTable::from_text("x \r\n".as_bytes());
    let table = EncodingTable::derive(&freq,&CodeTree::build(&freq));
    let mut out: Vec<u8> = Vec::new();
    let row_bytes = table.write_to(&mut out).expect("write failed");
    assert_eq!(String::from_utf8(out).unwrap(),"*TBL*\nx 00\nSP 01\nLF 10\nCR 11\n*TBL*\n");
    assert_eq!(row_bytes,5+6+6+6);
}

#[test]
fn parse_tokens() {
    let buf = "*TBL*\nx 00\nSP 01\nLF 10\nCR 11\n\t 0\n*TBL*\n\x1b".as_bytes();
    let (table,ptr) = EncodingTable::parse(buf).expect("parse failed");
    assert_eq!(table.code(b'x'),Some("00"));
    assert_eq!(table.code(b' '),Some("01"));
    assert_eq!(table.code(b'\r'),Some("10"));
    assert_eq!(table.code(b'\n'),Some("11"));
    assert_eq!(table.code(b'\t'),Some("0"));
    assert_eq!(buf[ptr..].to_vec(),vec![0x1b_u8]);
    assert_eq!(table.reverse()["10"],b'\r');
}

#[test]
fn parse_empty_table() {
    let (table,ptr) = EncodingTable::parse("*TBL*\n*TBL*\n".as_bytes()).expect("parse failed");
    assert!(table.is_empty());
    assert_eq!(ptr,12);
}

#[test]
fn parse_errors() {
    assert!(matches!(EncodingTable::parse(b"hello\n"),Err(Error::MissingTable)));
    assert!(matches!(EncodingTable::parse(b""),Err(Error::MissingTable)));
    assert!(matches!(EncodingTable::parse(b"*TBL*\na 0\n"),Err(Error::UnterminatedTable)));
    assert!(matches!(EncodingTable::parse(b"*TBL*\nab 0\n*TBL*\n"),Err(Error::BadTableEntry(_))));
    assert!(matches!(EncodingTable::parse(b"*TBL*\na 02\n*TBL*\n"),Err(Error::BadTableEntry(_))));
    assert!(matches!(EncodingTable::parse(b"*TBL*\na\n*TBL*\n"),Err(Error::BadTableEntry(_))));
}
