#![no_main]

//! Fuzz target for bridge argument parsing
//!
//! This target tests that arbitrary bytes never cause panics when parsed
//! as JSON arguments for any operation.

use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

use svnscope::handlers::{
    ListFilesInput, ReadFileInput, SelectDirectoryInput, SvnFileInput, SvnLogInput,
    WriteFileInput, parse_input,
};
use svnscope::router::Operation;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Operation lookup by arbitrary name
        let _ = s.parse::<Operation>();

        // Each input type straight from the text
        let _: Result<SelectDirectoryInput, _> = serde_json::from_str(s);
        let _: Result<SvnLogInput, _> = serde_json::from_str(s);
        let _: Result<ReadFileInput, _> = serde_json::from_str(s);
        let _: Result<SvnFileInput, _> = serde_json::from_str(s);
        let _: Result<WriteFileInput, _> = serde_json::from_str(s);
        let _: Result<ListFilesInput, _> = serde_json::from_str(s);

        // And through the handler entry point
        if let Ok(map) = serde_json::from_str::<Map<String, Value>>(s) {
            let _ = parse_input::<SvnLogInput>(Some(map.clone()));
            if let Ok(input) = parse_input::<SvnFileInput>(Some(map)) {
                let _ = input.revision.to_string();
            }
        }
    }

    let _: Result<Value, _> = serde_json::from_slice(data);
});
