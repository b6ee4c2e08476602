use rigsmith::chat::{Assistant, Session};
use structopt::StructOpt;

use crate::run_impl;

#[derive(StructOpt)]
pub struct Chat {
    #[structopt(required = true)]
    messages: Vec<String>,
}

run_impl!(Chat, self, ctx, ser, {
    let assistant = Assistant::new(&ctx.engine, &ctx.catalog);
    let mut session = Session::new("cli");
    for message in &self.messages {
        assistant.respond(&mut session, message).await;
    }
    erased_serde::serialize(&session, ser)?;
});
