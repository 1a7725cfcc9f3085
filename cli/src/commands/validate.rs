use alertchan_core::{Channel, validate_configuration};
use serde_json::json;

use crate::util::{channel_error, exit_error, print_json, read_json_from_file};

pub fn run(record: &str, compact: bool) -> i32 {
    let channel: Channel = match read_json_from_file(record) {
        Ok(c) => c,
        Err(e) => return exit_error(&e, None),
    };

    match validate_configuration(&channel.configuration) {
        Ok(()) => print_json(&json!({"valid": true, "name": channel.name}), compact),
        Err(e) => channel_error(&e),
    }
}
