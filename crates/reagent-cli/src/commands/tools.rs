use anyhow::Result;
use console::style;

pub fn execute() -> Result<()> {
    let registry = super::tool_registry();
    for name in registry.names() {
        if let Some(tool) = registry.get(&name) {
            println!("{}  {}", style(&name).cyan().bold(), style(tool.description()).dim());
        }
    }
    Ok(())
}
