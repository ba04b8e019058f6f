use anyhow::Result;
use cliclack::spinner;
use console::style;
use reagent::models::step::AgentResult;
use reagent::{Agent, AgentKind};

use crate::configuration::Settings;

pub async fn execute(
    settings: Settings,
    kind: Option<AgentKind>,
    trace: bool,
    question: &str,
) -> Result<()> {
    let kind = kind.unwrap_or(settings.agent.kind);
    let mut agent = super::agent_builder(settings, kind)?.build()?;

    let spin = spinner();
    spin.start(format!("running {} agent", kind));
    let result = agent.execute(question).await;
    spin.stop("");

    if trace {
        print_trace(&result);
    }

    // surface the typed error to main once the trace is printed
    let answer = result.into_result()?;
    super::render(&answer)?;
    println!();
    Ok(())
}

fn print_trace(result: &AgentResult) {
    for (index, step) in result.steps.iter().enumerate() {
        println!("{}", style(format!("step {}", index + 1)).bold());
        println!("  {} {}", style("thought:").dim(), step.thought);
        println!("  {} {}", style("action:").dim(), step.action);
        println!("  {} {}", style("input:").dim(), step.action_input);
        if let Some(observation) = &step.observation {
            println!("  {} {}", style("observation:").dim(), observation);
        }
    }
    println!(
        "{}",
        style(format!(
            "{} iterations in {}ms",
            result.iterations,
            result.elapsed.as_millis()
        ))
        .dim()
    );
    println!();
}
