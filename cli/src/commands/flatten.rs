use alertchan_core::{Channel, ImportState, flatten_channel, flatten_channel_data_source};

use super::expand::load_resource;
use crate::util::{channel_error, exit_error, print_json, read_json_from_file};

/// Flattens a backend channel record into the given resource and prints the
/// updated resource document (`{"id", "attributes", "state"}`).
pub fn run(record: &str, resource: &str, data_source: bool, import: bool, compact: bool) -> i32 {
    let channel: Channel = match read_json_from_file(record) {
        Ok(c) => c,
        Err(e) => {
            return exit_error(&e, Some("--record must be a channel as returned by the backend"));
        }
    };
    let mut resource = match read_json_from_file(resource) {
        Ok(raw) => match load_resource(raw) {
            Ok(r) => r,
            Err(e) => return exit_error(&e, None),
        },
        Err(e) => return exit_error(&e, None),
    };

    let import_state = if import {
        ImportState::Importing
    } else {
        ImportState::detect(&resource)
    };
    tracing::info!(
        channel_id = channel.id,
        import = import_state.is_import(),
        data_source,
        "flattening channel"
    );

    let result = if data_source {
        flatten_channel_data_source(&channel, &mut resource, import_state)
    } else {
        flatten_channel(&channel, &mut resource, import_state)
    };

    match result {
        Ok(()) => print_json(&resource, compact),
        Err(e) => channel_error(&e),
    }
}
