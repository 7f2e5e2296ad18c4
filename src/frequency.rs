//! Symbol frequency table
//!
//! Counting preserves the order in which symbols are first seen, but the finished table is
//! sorted by descending frequency, with ties broken by descending key.  The same ordering
//! drives the merges in the `tree` module, so it has to be reproduced exactly.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A symbol or a merged group of symbols, with its occurrence count.
/// For a leaf the key is a single byte, for a merged node it is the
/// concatenation of the keys of its two children.
#[derive(Clone,Debug,PartialEq)]
pub struct FrequencyEntry {
    pub key: Vec<u8>,
    pub frequency: usize
}

impl FrequencyEntry {
    pub fn leaf(symbol: u8,frequency: usize) -> Self {
        Self {
            key: vec![symbol],
            frequency
        }
    }
    /// Merge two entries, `bottom` keys come first
    pub fn merge(bottom: &FrequencyEntry,top: &FrequencyEntry) -> Self {
        Self {
            key: [bottom.key.as_slice(),top.key.as_slice()].concat(),
            frequency: bottom.frequency + top.frequency
        }
    }
}

/// Order by key, largest first.  Keys compare as unsigned bytes.
pub fn descending_by_key(first: &FrequencyEntry,second: &FrequencyEntry) -> Ordering {
    second.key.cmp(&first.key)
}

/// Order by frequency, largest first
pub fn descending_by_frequency(first: &FrequencyEntry,second: &FrequencyEntry) -> Ordering {
    second.frequency.cmp(&first.frequency)
}

/// Sort by key and then by frequency, both descending.  The second sort is stable,
/// so frequency dominates and the key breaks ties.
pub fn sort_entries(list: &mut [FrequencyEntry]) {
    list.sort_by(descending_by_key);
    list.sort_by(descending_by_frequency);
}

/// Frequency of every distinct byte in a text
#[derive(Clone,Debug,Default)]
pub struct FrequencyTable {
    entries: Vec<FrequencyEntry>
}

impl FrequencyTable {
    pub fn from_text(text: &[u8]) -> Self {
        let mut entries: Vec<FrequencyEntry> = Vec::new();
        let mut slot: HashMap<u8,usize> = HashMap::new();
        for c in text {
            match slot.get(c) {
                Some(i) => entries[*i].frequency += 1,
                None => {
                    slot.insert(*c,entries.len());
                    entries.push(FrequencyEntry::leaf(*c,1));
                }
            }
        }
        sort_entries(&mut entries);
        log::debug!("{} distinct symbols in {} bytes",entries.len(),text.len());
        Self {
            entries
        }
    }
    /// entries in sorted order
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// sum of all frequencies, i.e., the length of the text
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.frequency).sum()
    }
    pub fn frequency_of(&self,symbol: u8) -> Option<usize> {
        self.entries.iter().find(|e| e.key==[symbol]).map(|e| e.frequency)
    }
}

/// How a symbol is shown in the printed tables.  Newline and carriage return are
/// labeled `CR` and `LF` respectively, the legacy tool swapped them and we keep that.
/// Any other byte is shown as itself.
pub fn display_key(symbol: u8) -> Vec<u8> {
    match symbol {
        b'\n' => b"CR".to_vec(),
        b'\r' => b"LF".to_vec(),
        c => vec![c]
    }
}

#[test]
fn counting_works() {
    let table = FrequencyTable::from_text("abracadabra".as_bytes());
    let expected: Vec<(u8,usize)> = vec![(b'a',5),(b'r',2),(b'b',2),(b'd',1),(b'c',1)];
    let actual: Vec<(u8,usize)> = table.entries().iter().map(|e| (e.key[0],e.frequency)).collect();
    assert_eq!(actual,expected);
    assert_eq!(table.total(),11);
    assert_eq!(table.frequency_of(b'r'),Some(2));
    assert_eq!(table.frequency_of(b'z'),None);
}

#[test]
fn empty_text() {
    let table = FrequencyTable::from_text(&[]);
    assert!(table.is_empty());
    assert_eq!(table.total(),0);
}

#[test]
fn keys_compare_unsigned() {
    // 0xE9 must sort above ASCII when frequencies tie
    let table = FrequencyTable::from_text(&[b'a',0xe9,b'\n']);
    let keys: Vec<u8> = table.entries().iter().map(|e| e.key[0]).collect();
    assert_eq!(keys,vec![0xe9,b'a',b'\n']);
}

#[test]
fn comparators() {
    let a = FrequencyEntry::leaf(b'a',3);
    let b = FrequencyEntry::leaf(b'b',1);
    assert_eq!(descending_by_key(&a,&b),Ordering::Greater);
    assert_eq!(descending_by_frequency(&a,&b),Ordering::Less);
    let ab = FrequencyEntry::merge(&a,&b);
    assert_eq!(ab.key,b"ab".to_vec());
    assert_eq!(ab.frequency,4);
}

#[test]
fn display_swaps_line_endings() {
    assert_eq!(display_key(b'\n'),b"CR".to_vec());
    assert_eq!(display_key(b'\r'),b"LF".to_vec());
    assert_eq!(display_key(b' '),b" ".to_vec());
    assert_eq!(display_key(0xe9),vec![0xe9]);
}
