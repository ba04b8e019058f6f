use anyhow::Result;
use cliclack::{input, spinner};
use console::style;
use reagent::{Agent, AgentKind};

use crate::configuration::Settings;

pub async fn execute(settings: Settings) -> Result<()> {
    let mut agent = super::agent_builder(settings, AgentKind::Conversational)?
        .require_memory(true)
        .build_conversational()?;

    println!(
        "reagent chat {}",
        style("- type \"exit\" to end the session, \"/clear\" to forget the conversation").dim()
    );
    println!("\n");

    loop {
        let message_text: String = input("Message:").placeholder("").multiline().interact()?;
        let message_text = message_text.trim();

        if message_text.eq_ignore_ascii_case("exit") {
            break;
        }
        if message_text == "/clear" {
            agent.clear_memory();
            println!("{}", style("conversation cleared").dim());
            continue;
        }

        let spin = spinner();
        spin.start("awaiting reply");
        let result = agent.execute(message_text).await;
        spin.stop("");

        match result.error {
            None => super::render(&result.output)?,
            Some(err) => println!("{}", style(format!("error: {}", err)).red()),
        }
        println!("\n");
    }
    Ok(())
}
