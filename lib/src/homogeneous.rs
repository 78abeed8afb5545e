use crate::core::Core;
use crate::processor::ProcessorBase;

#[derive(Clone, Debug)]
pub struct HomogeneousProcessor {
    cores: Vec<Core>,
}

impl ProcessorBase for HomogeneousProcessor {
    fn new(num_cores: usize) -> Self {
        Self {
            cores: vec![Core::default(); num_cores],
        }
    }

    fn allocate(&mut self, core_id: usize, start_time: i64, exec_time: i64) -> i64 {
        self.cores[core_id].allocate(start_time, exec_time)
    }

    fn get_number_of_cores(&self) -> usize {
        self.cores.len()
    }

    fn get_earliest_free_time(&self) -> Option<i64> {
        self.cores.iter().map(|core| core.free_time).min()
    }

    fn get_idle_core_indices(&self, current_time: i64) -> Vec<usize> {
        self.cores
            .iter()
            .enumerate()
            .filter(|(_, core)| core.is_idle(current_time))
            .map(|(core_id, _)| core_id)
            .collect()
    }

    fn get_total_proc_time(&self, core_id: usize) -> i64 {
        self.cores[core_id].total_proc_time
    }
}
