use alertchan_core::{Channel, ChannelConfiguration, ChannelLinks, ChannelType, ErrorReport};
use utoipa::OpenApi;

use crate::util::exit_error;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "alertchan",
        description = "Alert channel records as submitted to and read from the alerting backend."
    ),
    components(schemas(Channel, ChannelConfiguration, ChannelLinks, ChannelType, ErrorReport))
)]
struct SchemaDoc;

pub fn run(compact: bool) -> i32 {
    let doc = SchemaDoc::openapi();
    let rendered = if compact {
        doc.to_json()
    } else {
        doc.to_pretty_json()
    };
    match rendered {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => exit_error(&format!("Failed to render schema: {e}"), None),
    }
}
