//! Conversion between bytes and strings of `'0'` and `'1'` characters.
//! Bits are always taken MSB first, which is what the `bit_vec` crate does.

use bit_vec::BitVec;
use crate::{Error,Tail};

/// Spell out every byte as 8 binary digits
pub fn bytes_to_bit_string(bytes: &[u8]) -> String {
    BitVec::from_bytes(bytes).iter().map(|bit| match bit {
        true => '1',
        false => '0'
    }).collect()
}

/// Pack a string of binary digits into bytes.  If the length is not a multiple of 8,
/// the last byte is formed according to `tail`.
pub fn bit_string_to_bytes(bits: &str,tail: Tail) -> Result<Vec<u8>,Error> {
    let mut bv = BitVec::with_capacity(bits.len());
    for c in bits.chars() {
        match c {
            '0' => bv.push(false),
            '1' => bv.push(true),
            _ => return Err(Error::InvalidBitString(c))
        }
    }
    let rem = bv.len() % 8;
    // bit_vec fills the low end of the last byte with zeros
    let mut ans = bv.to_bytes();
    if rem > 0 && tail==Tail::RightAligned {
        if let Some(last) = ans.last_mut() {
            *last >>= 8 - rem;
        }
    }
    Ok(ans)
}

#[test]
fn spell_out() {
    assert_eq!(bytes_to_bit_string(&[0x96,0x01]),"1001011000000001");
    assert_eq!(bytes_to_bit_string(&[]),"");
}

#[test]
fn pack_whole_bytes() {
    let bytes = bit_string_to_bytes("1111000000011011",Tail::RightAligned).expect("packing failed");
    assert_eq!(bytes,hex::decode("F01B").unwrap());
    let bytes = bit_string_to_bytes("1111000000011011",Tail::ZeroFilled).expect("packing failed");
    assert_eq!(bytes,hex::decode("F01B").unwrap());
}

#[test]
fn pack_partial_byte() {
    let bytes = bit_string_to_bytes(&"100101100011000010010110"[0..23],Tail::RightAligned).expect("packing failed");
    assert_eq!(bytes,hex::decode("96304B").unwrap());
    let bytes = bit_string_to_bytes("0001",Tail::RightAligned).expect("packing failed");
    assert_eq!(bytes,vec![0x01]);
    let bytes = bit_string_to_bytes("0001",Tail::ZeroFilled).expect("packing failed");
    assert_eq!(bytes,vec![0x10]);
}

#[test]
fn reject_non_binary() {
    match bit_string_to_bytes("0120",Tail::ZeroFilled) {
        Err(Error::InvalidBitString('2')) => {},
        _ => panic!("expected an invalid bit string")
    }
}
