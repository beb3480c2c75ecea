use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // VERGEN_CARGO_TARGET_TRIPLE doubles as the host target for the active-target default
    vergen_gitcl::Emitter::default()
        .add_instructions(
            &vergen_gitcl::CargoBuilder::default()
                .target_triple(true)
                .build()?,
        )?
        .add_instructions(
            &vergen_gitcl::GitclBuilder::default()
                .sha(true)
                .dirty(true)
                .build()?,
        )?
        .emit()?;
    Ok(())
}
