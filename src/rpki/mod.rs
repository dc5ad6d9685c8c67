pub mod rpki_loader;
