pub mod container_info;
pub mod stats;

pub fn get_cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(|c| c.get())
        .unwrap_or(1)
}
