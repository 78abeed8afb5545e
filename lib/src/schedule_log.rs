use serde_derive::{Deserialize, Serialize};

use crate::processor::ProcessorBase;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLog {
    pub core_id: usize,
    pub node_id: usize,
    pub task_name: String,
    pub start_time: i64,
    pub finish_time: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessorLog {
    pub average_utilization: f32,
    pub variance_utilization: f32,
    pub core_logs: Vec<CoreLog>,
}

impl ProcessorLog {
    pub fn new(num_cores: usize) -> Self {
        Self {
            average_utilization: Default::default(),
            variance_utilization: Default::default(),
            core_logs: (0..num_cores).map(CoreLog::new).collect(),
        }
    }

    /// Fill the log from the busy time each core accumulated during a run.
    pub fn from_processor(processor: &impl ProcessorBase, schedule_length: i64) -> Self {
        let mut processor_log = Self::new(processor.get_number_of_cores());
        for core_log in processor_log.core_logs.iter_mut() {
            core_log.total_proc_time = processor.get_total_proc_time(core_log.core_id);
        }
        processor_log.calculate_cores_utilization(schedule_length);
        processor_log.calculate_average_utilization();
        processor_log.calculate_variance_utilization();
        processor_log
    }

    pub fn calculate_average_utilization(&mut self) {
        if self.core_logs.is_empty() {
            return;
        }
        self.average_utilization = self
            .core_logs
            .iter()
            .map(|core_log| core_log.utilization)
            .sum::<f32>()
            / self.core_logs.len() as f32;
    }

    pub fn calculate_variance_utilization(&mut self) {
        if self.core_logs.is_empty() {
            return;
        }
        self.variance_utilization = self
            .core_logs
            .iter()
            .map(|core_log| (core_log.utilization - self.average_utilization).powi(2))
            .sum::<f32>()
            / self.core_logs.len() as f32;
    }

    pub fn calculate_cores_utilization(&mut self, schedule_length: i64) {
        for core_log in self.core_logs.iter_mut() {
            core_log.calculate_utilization(schedule_length);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreLog {
    pub core_id: usize,
    pub total_proc_time: i64,
    pub utilization: f32,
}

impl CoreLog {
    pub fn new(core_id: usize) -> Self {
        Self {
            core_id,
            total_proc_time: Default::default(),
            utilization: Default::default(),
        }
    }

    pub fn calculate_utilization(&mut self, schedule_length: i64) {
        self.utilization = if schedule_length > 0 {
            self.total_proc_time as f32 / schedule_length as f32
        } else {
            0.0
        };
    }
}
