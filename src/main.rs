use clap::{arg,crate_version,Command};
use std::io::{Read,Seek};
use huffcoder::{huffman,Tail,STD_OPTIONS};
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";

fn ok_to_overwrite(path_out: &str) -> bool {
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        if ans.trim_end()=="y" || ans.trim_end()=="Y" {
            return true;
        }
        return false;
    }
    true
}

/// Read the whole input file, exit with status 1 if it cannot be opened
fn read_input(path_in: &str) -> Result<Vec<u8>,std::io::Error> {
    let mut in_file = match std::fs::File::open(path_in) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("{}",e);
            eprintln!("could not open the file: {}",path_in);
            std::process::exit(1);
        }
    };
    let mut ans = Vec::new();
    in_file.read_to_end(&mut ans)?;
    Ok(ans)
}

/// Open the output file for writing, exit with status 1 if it cannot be opened
fn open_output(path_out: &str) -> std::fs::File {
    match std::fs::OpenOptions::new().write(true).truncate(false).create(true).open(path_out) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("{}",e);
            eprintln!("could not open the file: {}",path_out);
            std::process::exit(1);
        }
    }
}

fn options(cmd: &clap::ArgMatches) -> huffcoder::Options {
    let mut opt = STD_OPTIONS;
    if let Ok(Some(tail)) = cmd.try_get_one::<String>("tail") {
        opt.tail = match tail.as_str() {
            "zero" => Tail::ZeroFilled,
            _ => Tail::RightAligned
        };
    }
    if let Ok(Some(strict)) = cmd.try_get_one::<bool>("strict") {
        opt.strict = *strict;
    }
    opt
}

fn main() -> STDRESULT
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"Examples:
---------
Frequencies:   `huffcoder frequency -i my_text`
Code table:    `huffcoder encoding-table -i my_text`
One code:      `huffcoder single -i my_text -c e`
Encode:        `huffcoder encode -i my_text -o my_encoded`
Decode:        `huffcoder decode -i my_encoded -o my_text`";

    let tails = ["right","zero"];

    let mut main_cmd = Command::new("huffcoder")
        .about("Huffman coding of text with a readable code table")
        .after_long_help(long_help)
        .subcommand_required(true)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(Command::new("frequency")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .about("print the symbol frequencies"));

    main_cmd = main_cmd.subcommand(Command::new("encoding-table")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .about("print the code of every symbol"));

    main_cmd = main_cmd.subcommand(Command::new("single")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-c --char <CHAR> "symbol to look up, only the first byte is used").required(true))
        .about("print the code of one symbol"));

    main_cmd = main_cmd.subcommand(Command::new("encode")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .arg(arg!(-t --tail <TAIL> "packing of a partial last byte").value_parser(tails)
            .required(false))
        .about("encode a file"));

    main_cmd = main_cmd.subcommand(Command::new("decode")
        .arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .arg(arg!(--strict "fail if bits are left over at the end"))
        .about("decode a file"));

    let matches = match main_cmd.try_get_matches() {
        Ok(m) => m,
        Err(e) => {
            e.print()?;
            std::process::exit(match e.use_stderr() {
                true => 1,
                false => 0
            });
        }
    };

    if let Some(cmd) = matches.subcommand_matches("frequency") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let huff = huffman::Huffman::from_text(&read_input(path_in)?);
        huff.print_frequency_table(&mut std::io::stdout())?;
    }

    if let Some(cmd) = matches.subcommand_matches("encoding-table") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let huff = huffman::Huffman::from_text(&read_input(path_in)?);
        huff.print_encoding_table(&mut std::io::stdout())?;
    }

    if let Some(cmd) = matches.subcommand_matches("single") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let c = match cmd.get_one::<String>("char").expect(RCH).as_bytes().first() {
            Some(c) => *c,
            None => {
                eprintln!("no symbol was given");
                std::process::exit(1);
            }
        };
        let huff = huffman::Huffman::from_text(&read_input(path_in)?);
        println!("{}",huff.character_code(c));
    }

    if let Some(cmd) = matches.subcommand_matches("encode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let text = read_input(path_in)?;
        let mut out_file = open_output(path_out);
        let huff = huffman::Huffman::from_text(&text);
        let bytes = huff.write_encoded(&text,&mut out_file,&options(cmd))?;
        let out_size = out_file.stream_position()?;
        out_file.set_len(out_size)?;
        println!("{} bytes written (encoded with bits).",bytes);
    }

    if let Some(cmd) = matches.subcommand_matches("decode") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let encoded = read_input(path_in)?;
        let mut out_file = open_output(path_out);
        match huffman::expand(&mut encoded.as_slice(),&mut out_file,&options(cmd)) {
            Ok((in_size,out_size)) => {
                out_file.set_len(out_size)?;
                log::info!("expanded {} into {}",in_size,out_size);
                println!("File decoded.");
            },
            Err(e) => eprintln!("{}",e)
        }
    }

    Ok(())
}
