use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command; // Run programs
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

// Write the text into the temporary directory.  We generate inputs rather than
// keeping them in the repository, so that git newline substitutions cannot alter them.
fn make_input(temp_dir: &tempfile::TempDir,name: &str,dat: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let path = temp_dir.path().join(name);
    match std::fs::write(&path,dat) {
        Ok(_) => Ok(path),
        Err(e) => Err(Box::new(e))
    }
}

fn encode_test(txt: &[u8],expected: &[u8],tail: &str) -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffcoder")?;
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.txt",txt)?;
    let out_path = temp_dir.path().join("plain.huf");
    cmd.arg("encode")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .arg("-t").arg(tail)
        .assert()
        .success()
        .stdout(predicate::str::contains("bytes written (encoded with bits)"));
    match std::fs::read(out_path) {
        Ok(v) => assert_eq!(v,expected.to_vec()),
        _ => panic!("unable to compare output with reference")
    }
    Ok(())
}

fn decode_test(encoded: &[u8],expected: &[u8]) -> STDRESULT {
    let mut cmd = Command::cargo_bin("huffcoder")?;
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.huf",encoded)?;
    let out_path = temp_dir.path().join("plain.txt");
    cmd.arg("decode")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("File decoded."));
    match std::fs::read(out_path) {
        Ok(v) => assert_eq!(v,expected.to_vec()),
        _ => panic!("unable to compare output with reference")
    }
    Ok(())
}

#[test]
fn encoding() -> STDRESULT {
    let expected = [b"*TBL*\nb 0\na 1\n*TBL*\n".to_vec(),hex::decode("F0")?].concat();
    encode_test(b"aaaabbbb",&expected,"right")?;
    let expected = [b"*TBL*\nx 00\nSP 01\nLF 10\nCR 11\n*TBL*\n".to_vec(),hex::decode("1B")?].concat();
    encode_test(b"x \r\n",&expected,"right")?;
    let expected = [b"*TBL*\na 1\nr 01\nb 001\nd 0000\nc 0001\n*TBL*\n".to_vec(),hex::decode("963096")?].concat();
    encode_test(b"abracadabra",&expected,"zero")
}

#[test]
fn decoding() -> STDRESULT {
    let encoded = [b"*TBL*\nb 0\na 1\n*TBL*\n".to_vec(),hex::decode("F0")?].concat();
    decode_test(&encoded,b"aaaabbbb")?;
    let encoded = [b"*TBL*\nx 00\nSP 01\nLF 10\nCR 11\n*TBL*\n".to_vec(),hex::decode("1B")?].concat();
    decode_test(&encoded,b"x \r\n")?;
    decode_test(b"*TBL*\n*TBL*\n",b"")
}

#[test]
fn frequency_table() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.txt",b"aab\n")?;
    Command::cargo_bin("huffcoder")?
        .arg("frequency")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout("{element:  a, frequency: 2}\n{element:  b, frequency: 1}\n{element: CR, frequency: 1}\n");
    Ok(())
}

#[test]
fn encoding_table() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.txt",b"aab\n")?;
    Command::cargo_bin("huffcoder")?
        .arg("encoding-table")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout("{key:  a, code: 1}\n{key:  b, code: 00}\n{key: CR, code: 01}\n");
    Ok(())
}

#[test]
fn single_code() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.txt",b"abracadabra")?;
    Command::cargo_bin("huffcoder")?
        .arg("single")
        .arg("-i").arg(&in_path)
        .arg("-c").arg("d")
        .assert()
        .success()
        .stdout("0000\n");
    Command::cargo_bin("huffcoder")?
        .arg("single")
        .arg("-i").arg(&in_path)
        .arg("-c").arg("z")
        .assert()
        .success()
        .stdout("NotFound\n");
    Ok(())
}

#[test]
fn missing_file() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("nothing.txt");
    Command::cargo_bin("huffcoder")?
        .arg("frequency")
        .arg("-i").arg(&in_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not open the file"));
    Ok(())
}

#[test]
fn missing_arguments() -> STDRESULT {
    Command::cargo_bin("huffcoder")?
        .assert()
        .code(1);
    Command::cargo_bin("huffcoder")?
        .arg("encode")
        .arg("-i").arg("plain.txt")
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn missing_table() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.huf",b"just some text\n")?;
    let out_path = temp_dir.path().join("plain.txt");
    Command::cargo_bin("huffcoder")?
        .arg("decode")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("File decoded.").not())
        .stderr(predicate::str::contains("could not find an encoding table").count(1));
    Ok(())
}

#[test]
fn strict_decoding() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let encoded = [b"*TBL*\na 1\nr 01\nb 001\nd 0000\nc 0001\n*TBL*\n".to_vec(),hex::decode("963096")?].concat();
    let in_path = make_input(&temp_dir,"plain.huf",&encoded)?;
    let out_path = temp_dir.path().join("plain.txt");
    Command::cargo_bin("huffcoder")?
        .arg("decode")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .arg("--strict")
        .assert()
        .success()
        .stdout(predicate::str::contains("File decoded.").not())
        .stderr(predicate::str::contains("1 trailing bits do not complete a code").count(1));
    Ok(())
}

#[test]
fn raw_bytes_in_tables() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = make_input(&temp_dir,"plain.txt",&[0xe9,0xe9,b'\r'])?;
    let expected = [b"{element:  ".to_vec(),vec![0xe9],b", frequency: 2}\n{element: LF, frequency: 1}\n".to_vec()].concat();
    Command::cargo_bin("huffcoder")?
        .arg("frequency")
        .arg("-i").arg(&in_path)
        .assert()
        .success()
        .stdout(expected);
    Ok(())
}

#[test]
fn round_trip() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    // 32 code bits, so the payload is whole bytes
    let txt = b"abcdabcdabcdabcd";
    let in_path = make_input(&temp_dir,"plain.txt",txt)?;
    let mid_path = temp_dir.path().join("plain.huf");
    let out_path = temp_dir.path().join("plain2.txt");
    Command::cargo_bin("huffcoder")?
        .arg("encode")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&mid_path)
        .assert()
        .success();
    Command::cargo_bin("huffcoder")?
        .arg("decode")
        .arg("-i").arg(&mid_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();
    assert_eq!(std::fs::read(out_path)?,txt.to_vec());
    Ok(())
}
