use pagewire_frame::{status_name, STATUS_IN_SERVICE, STATUS_OUT_OF_SERVICE};

use crate::cmd::{pager_field, with_client, VerifyArgs};
use crate::exit::{CliResult, FAILURE, SUCCESS};

pub fn run(args: VerifyArgs) -> CliResult<i32> {
    let pager = pager_field(args.number)?;
    let status = with_client(&args.server, |client| client.verify(&pager))?;

    println!("pager {pager}: {}", status_name(status));
    match status {
        STATUS_IN_SERVICE | STATUS_OUT_OF_SERVICE => Ok(SUCCESS),
        _ => Ok(FAILURE),
    }
}
