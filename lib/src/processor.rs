pub trait ProcessorBase {
    fn new(num_cores: usize) -> Self;
    /// Put `exec_time` units of work on a core and return its finish time.
    /// The scheduler only hands work to cores idle at `start_time`.
    fn allocate(&mut self, core_id: usize, start_time: i64, exec_time: i64) -> i64;
    fn get_number_of_cores(&self) -> usize;
    /// Earliest moment any core can take new work. None without cores.
    fn get_earliest_free_time(&self) -> Option<i64>;
    /// Cores free at `current_time`, ascending by index.
    fn get_idle_core_indices(&self, current_time: i64) -> Vec<usize>;
    fn get_total_proc_time(&self, core_id: usize) -> i64;
}
