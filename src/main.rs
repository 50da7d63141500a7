mod bytecode;
mod lang;
mod runtime;

use std::{env, fs, path::Path, process};

use crate::bytecode::chunk::{Chunk, Constant};
use crate::bytecode::disasm::disassemble;
use crate::bytecode::op::OpCode;
use crate::runtime::vm::Vm;

fn main() {
    let args: Vec<String> = env::args().collect();

    let disasm_only = args.contains(&"--disasm".to_string());

    // first non-flag argument is the filename
    let filename = args.iter().skip(1).find(|a| !a.starts_with('-'));

    match filename {
        Some(filename) => {
            ensure_extension(filename);
            match fs::read(filename) {
                Ok(bytes) => run_file(&bytes, filename, disasm_only),
                Err(e) => {
                    eprintln!("Failed to read '{}': {}", filename, e);
                    process::exit(1);
                }
            }
        }
        None => {
            if args.len() == 1 {
                run_demo();
            } else {
                print_usage();
            }
        }
    }
}

fn ensure_extension(filename: &str) {
    let path = Path::new(filename);
    if path.extension().and_then(|e| e.to_str()) != Some("cinb") {
        eprintln!("Error: expected a .cinb chunk file, got {}", filename);
        process::exit(1);
    }
}

fn print_usage() {
    println!("CINDER - Stack-Based Bytecode Virtual Machine");
    println!();
    println!("Usage:");
    println!("  cinder                     Run the built-in demo chunk");
    println!("  cinder <file.cinb>         Run a serialized bytecode chunk");
    println!("  cinder --disasm <file>     Disassemble a chunk without running it");
}

fn run_file(bytes: &[u8], filename: &str, disasm_only: bool) {
    let chunk = match Chunk::from_bytes(bytes) {
        Ok(chunk) => chunk,
        Err(e) => {
            eprintln!("Failed to decode '{}': {}", filename, e);
            process::exit(1);
        }
    };

    if disasm_only {
        disassemble(&chunk, filename);
        return;
    }

    let mut vm = Vm::new();
    if let Err(e) = vm.interpret(&chunk) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run_demo() {
    let chunk = demo_chunk();
    disassemble(&chunk, "demo");
    println!();

    let mut vm = Vm::new();
    if let Err(e) = vm.interpret(&chunk) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Prints `-((1.2 + 3.4) / 5.6)` and then a string built by concatenation.
fn demo_chunk() -> Chunk {
    let mut chunk = Chunk::new();

    let constant = |chunk: &mut Chunk, c: Constant, line: u32| {
        let index = chunk.add_constant(c);
        chunk.write(OpCode::Constant, line);
        chunk.write_byte(index as u8, line);
    };

    constant(&mut chunk, Constant::Number(1.2), 1);
    constant(&mut chunk, Constant::Number(3.4), 1);
    chunk.write(OpCode::Add, 1);
    constant(&mut chunk, Constant::Number(5.6), 1);
    chunk.write(OpCode::Divide, 1);
    chunk.write(OpCode::Negate, 1);
    chunk.write(OpCode::Print, 1);

    constant(&mut chunk, Constant::String("hello, ".to_string()), 2);
    constant(&mut chunk, Constant::String("cinder".to_string()), 2);
    chunk.write(OpCode::Add, 2);
    chunk.write(OpCode::Print, 2);

    chunk.write(OpCode::Return, 3);
    chunk
}
