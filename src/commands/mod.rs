pub mod handle_apply;
pub mod handle_filters;
pub mod handle_slurm;
