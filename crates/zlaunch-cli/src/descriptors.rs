//! `descriptors` command: print the engine's operation catalog.

use zlaunch_core::{Descriptor, Launcher, LauncherConfig};

/// Query the engine and print every operation, sorted by name.
pub fn execute(config: LauncherConfig, json: bool) -> anyhow::Result<()> {
    let launcher = Launcher::new(config);
    let catalog = launcher.query_descriptors()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("Engine reported no operations.");
        return Ok(());
    }

    for (name, desc) in catalog.sorted() {
        println!("{}", format_descriptor(name, desc));
    }
    println!("\n{} operations", catalog.len());

    Ok(())
}

fn format_descriptor(name: &str, desc: &Descriptor) -> String {
    let params: Vec<String> = desc
        .params
        .iter()
        .map(|p| format!("{} {} = {}", p.type_tag, p.name, p.default))
        .collect();

    let mut out = format!(
        "{}({}) -> ({})",
        name,
        desc.inputs.join(", "),
        desc.outputs.join(", ")
    );
    if !params.is_empty() {
        out.push_str(&format!("\n    params: {}", params.join(", ")));
    }
    if !desc.categories.is_empty() {
        out.push_str(&format!("\n    categories: {}", desc.categories.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zlaunch_core::ParamDescriptor;

    #[test]
    fn test_format_descriptor() {
        let desc = Descriptor {
            inputs: vec!["a".to_string(), "b".to_string()],
            outputs: vec![],
            params: vec![ParamDescriptor::new("int", "x", "0")],
            categories: vec!["cat1".to_string()],
        };
        assert_eq!(
            format_descriptor("Foo", &desc),
            "Foo(a, b) -> ()\n    params: int x = 0\n    categories: cat1"
        );
    }

    #[test]
    fn test_format_bare_descriptor() {
        assert_eq!(format_descriptor("Bar", &Descriptor::default()), "Bar() -> ()");
    }
}
