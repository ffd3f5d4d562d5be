#![no_main]

use bmff_io::fuzz::session::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: FuzzCase| harness(data));
