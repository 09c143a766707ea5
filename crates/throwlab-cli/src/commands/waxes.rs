use crate::cli::WaxesArgs;
use crate::error::Result;
use crate::input::load_registry;
use throwlab::core::registry::wax::WaxRegistry;

fn render(registry: &WaxRegistry) -> String {
    let width = registry.keys().map(str::len).max().unwrap_or(0);
    let mut out = String::new();
    for (key, wax) in registry.iter() {
        out.push_str(&format!(
            "{:<width$}  {:<28} melt pool {:>5.1} °C  channels {:.2}\n",
            key,
            wax.name,
            wax.melt_pool_temperature,
            wax.channel_factor,
            width = width
        ));
    }
    out
}

pub fn run(args: WaxesArgs) -> Result<()> {
    let registry = load_registry(args.waxes.as_deref())?;
    print!("{}", render(&registry));
    Ok(())
}
