//! Echo bot: repeats group messages back and answers private messages
//! with a quick reply.
//!
//! Connection settings come from the `ONEBOT_*` environment variables,
//! falling back to a local server and account 10000.

use onebot_client::{Bot, ConnectConfig, Flow, MessageChain, RatePolicy, TokenBucket};
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    onebot_logging::init_subscriber("info");

    let config =
        ConnectConfig::from_env().unwrap_or_else(|_| ConnectConfig::new("localhost", 6700, 10_000));
    let bot = Bot::connect(config).await?;
    bot.set_limiter(RatePolicy::Drop, TokenBucket::new(1.0, 10));

    bot.on_group_message(|bot, event| async move {
        let reply =
            MessageChain::new().text(format!("you said:\n{}", event.message.plain_text()));
        if let Err(error) = bot.send_group_message(event.group_id, reply).await {
            warn!(%error, "echo failed");
        }
        Flow::Continue
    });

    bot.on_private_message(|bot, event| async move {
        let reply = MessageChain::new().text(event.message.plain_text());
        if let Err(error) = bot.reply_private(&event, reply).await {
            warn!(%error, "reply failed");
        }
        Flow::Continue
    });

    bot.closed().await;
    Ok(())
}
