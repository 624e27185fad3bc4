use clap::Parser;
use mirror_rs::{
    model::ModelProvider,
    ReflectionProvider,
};
use std::{path::PathBuf, process::ExitCode};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Dump the declared fields and methods of a type in a host model"
)]
struct Args {
    /// The model file to load
    model: PathBuf,
    /// The fully qualified name of the type to dump (e.g. java.lang.Object)
    type_name: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let provider = match ModelProvider::from_path(&args.model) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading model: {}", e);
            return ExitCode::from(1);
        }
    };

    if print_type_info(&provider, &args.type_name) {
        return ExitCode::SUCCESS;
    }

    eprintln!("Type '{}' not found in model", args.type_name);
    println!("\nAvailable types:");
    for name in provider.type_names() {
        println!("  {}", name);
    }
    ExitCode::from(1)
}

fn print_type_info(provider: &ModelProvider, type_name: &str) -> bool {
    let Some(ty) = provider.type_named(type_name) else {
        return false;
    };
    println!("Type: {:?}", ty);

    println!("\nFields:");
    for field in provider.declared_fields(&ty).unwrap_or_default() {
        println!("  - {}: {:?}", field.name, field.access);
    }

    println!("\nMethods:");
    for method in provider.declared_methods(&ty).unwrap_or_default() {
        let parameters: Vec<_> = method.parameters.iter().map(|p| p.name()).collect();
        println!(
            "  - {}({}): {:?}",
            method.name,
            parameters.join(", "),
            method.access
        );
    }
    true
}
