use crate::cmd::{pager_field, with_client, SendArgs};
use crate::exit::{CliResult, FAILURE, SUCCESS};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let pager = pager_field(args.number)?;
    let queued = with_client(&args.server, |client| {
        client.send_message(&pager, &args.message)
    })?;

    if queued {
        println!("message queued successfully");
        Ok(SUCCESS)
    } else {
        println!("failed sending message");
        Ok(FAILURE)
    }
}
