use notifybot_core::settings::IntentsConfig;
use serenity::prelude::GatewayIntents;

/// Translate the configured capabilities into gateway intents.
pub fn intents_from_config(config: &IntentsConfig) -> GatewayIntents {
    let mut intents = GatewayIntents::empty();

    if config.message_content {
        intents |= GatewayIntents::MESSAGE_CONTENT;
    }
    if config.guilds {
        intents |= GatewayIntents::GUILDS;
    }
    if config.members {
        intents |= GatewayIntents::GUILD_MEMBERS;
    }
    if config.guild_messages {
        intents |= GatewayIntents::GUILD_MESSAGES;
    }
    if config.dm_messages {
        intents |= GatewayIntents::DIRECT_MESSAGES;
    }

    intents
}
