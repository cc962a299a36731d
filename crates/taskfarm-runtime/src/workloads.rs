//! Placeholder work-unit kinds mirroring a synthetic ML pipeline:
//! model training, data aggregation, and evaluation scoring. The bodies
//! burn a priority-scaled delay plus a little arithmetic and have no
//! real semantic value; the scheduler treats them as opaque payloads.

use rand::Rng;
use std::thread;
use std::time::Duration;
use taskfarm_core::{
    FieldMap, FieldValue, KindRegistry, Priority, Result, TaskSpec, WorkUnit,
};

pub const MODEL_TRAINING: &str = "model_training";
pub const DATA_AGGREGATION: &str = "data_aggregation";
pub const MODEL_EVALUATION: &str = "model_evaluation";

/// Registry with all built-in kinds registered.
pub fn default_registry() -> KindRegistry {
    let mut registry = KindRegistry::new();
    registry.register(MODEL_TRAINING, ModelTrainingTask::build);
    registry.register(DATA_AGGREGATION, DataAggregationTask::build);
    registry.register(MODEL_EVALUATION, ModelEvaluationTask::build);
    registry
}

/// The fixed demo task list: two critical tasks, three mid-tier, three
/// background.
pub fn demo_tasks() -> Vec<TaskSpec> {
    vec![
        ModelTrainingTask::new("model_critical", Priority::High, 1000, 50).spec(),
        DataAggregationTask::new("sensor_data", Priority::High, 500).spec(),
        ModelTrainingTask::new("model_secondary", Priority::Medium, 800, 30).spec(),
        ModelEvaluationTask::new("model_validation", Priority::Medium, 200).spec(),
        DataAggregationTask::new("batch_processing", Priority::Medium, 300).spec(),
        ModelTrainingTask::new("model_background", Priority::Low, 600, 20).spec(),
        ModelEvaluationTask::new("final_validation", Priority::Low, 100).spec(),
        DataAggregationTask::new("archive_data", Priority::Low, 150).spec(),
    ]
}

fn priority_delay(priority: Priority, millis: [u64; 3]) -> Duration {
    Duration::from_millis(millis[priority.rank() as usize])
}

fn random_row<const N: usize>(rng: &mut impl Rng) -> [f64; N] {
    let mut row = [0.0; N];
    for value in &mut row {
        *value = rng.gen::<f64>() * 2.0 - 1.0;
    }
    row
}

/// Trains a throwaway linear model on synthetic data.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTrainingTask {
    pub name: String,
    pub priority: Priority,
    pub data_size: usize,
    pub epochs: usize,
}

impl ModelTrainingTask {
    pub fn new(name: impl Into<String>, priority: Priority, data_size: usize, epochs: usize) -> Self {
        ModelTrainingTask {
            name: name.into(),
            priority,
            data_size,
            epochs,
        }
    }

    pub fn from_spec(spec: &TaskSpec) -> Result<Self> {
        Ok(ModelTrainingTask {
            name: spec.name.clone(),
            priority: spec.priority,
            data_size: spec.field_i64("data_size")? as usize,
            epochs: spec.field_i64("epochs")? as usize,
        })
    }

    pub fn build(spec: &TaskSpec) -> Result<Box<dyn WorkUnit>> {
        Ok(Box::new(Self::from_spec(spec)?))
    }
}

impl WorkUnit for ModelTrainingTask {
    fn kind(&self) -> &'static str {
        MODEL_TRAINING
    }

    fn spec(&self) -> TaskSpec {
        let mut fields = FieldMap::new();
        fields.insert("data_size".to_string(), FieldValue::Int(self.data_size as i64));
        fields.insert("epochs".to_string(), FieldValue::Int(self.epochs as i64));
        TaskSpec::new(MODEL_TRAINING, self.name.clone(), self.priority, fields)
    }

    fn execute(&self) -> String {
        thread::sleep(priority_delay(self.priority, [100, 300, 500]));

        let mut rng = rand::thread_rng();
        let rows: Vec<[f64; 10]> = (0..self.data_size).map(|_| random_row(&mut rng)).collect();
        let targets: Vec<f64> = (0..self.data_size).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();

        let mut weights = [0.0f64; 10];
        let learning_rate = 0.01;
        for _ in 0..self.epochs {
            for (row, target) in rows.iter().zip(&targets) {
                let prediction: f64 = row
                    .iter()
                    .zip(&weights)
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
                    .tanh();
                let error = prediction - target;
                for (weight, x) in weights.iter_mut().zip(row) {
                    *weight -= learning_rate * error * x;
                }
            }
        }

        format!("{} - training complete - {} epochs", self.name, self.epochs)
    }
}

/// Reduces a synthetic sample batch to per-feature means.
#[derive(Debug, Clone, PartialEq)]
pub struct DataAggregationTask {
    pub name: String,
    pub priority: Priority,
    pub data_points: usize,
}

impl DataAggregationTask {
    pub fn new(name: impl Into<String>, priority: Priority, data_points: usize) -> Self {
        DataAggregationTask {
            name: name.into(),
            priority,
            data_points,
        }
    }

    pub fn from_spec(spec: &TaskSpec) -> Result<Self> {
        Ok(DataAggregationTask {
            name: spec.name.clone(),
            priority: spec.priority,
            data_points: spec.field_i64("data_points")? as usize,
        })
    }

    pub fn build(spec: &TaskSpec) -> Result<Box<dyn WorkUnit>> {
        Ok(Box::new(Self::from_spec(spec)?))
    }
}

impl WorkUnit for DataAggregationTask {
    fn kind(&self) -> &'static str {
        DATA_AGGREGATION
    }

    fn spec(&self) -> TaskSpec {
        let mut fields = FieldMap::new();
        fields.insert(
            "data_points".to_string(),
            FieldValue::Int(self.data_points as i64),
        );
        TaskSpec::new(DATA_AGGREGATION, self.name.clone(), self.priority, fields)
    }

    fn execute(&self) -> String {
        thread::sleep(priority_delay(self.priority, [50, 100, 200]));

        const FEATURES: usize = 20;
        let mut rng = rand::thread_rng();
        let mut sums = [0.0f64; FEATURES];
        for _ in 0..self.data_points {
            let row: [f64; FEATURES] = random_row(&mut rng);
            for (sum, value) in sums.iter_mut().zip(&row) {
                *sum += value;
            }
        }
        let divisor = self.data_points.max(1) as f64;
        for sum in &mut sums {
            *sum /= divisor;
        }

        format!("{} - data processed: {} features", self.name, FEATURES)
    }
}

/// Scores a pretend model on a synthetic test split.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEvaluationTask {
    pub name: String,
    pub priority: Priority,
    pub test_size: usize,
}

impl ModelEvaluationTask {
    pub fn new(name: impl Into<String>, priority: Priority, test_size: usize) -> Self {
        ModelEvaluationTask {
            name: name.into(),
            priority,
            test_size,
        }
    }

    pub fn from_spec(spec: &TaskSpec) -> Result<Self> {
        Ok(ModelEvaluationTask {
            name: spec.name.clone(),
            priority: spec.priority,
            test_size: spec.field_i64("test_size")? as usize,
        })
    }

    pub fn build(spec: &TaskSpec) -> Result<Box<dyn WorkUnit>> {
        Ok(Box::new(Self::from_spec(spec)?))
    }
}

impl WorkUnit for ModelEvaluationTask {
    fn kind(&self) -> &'static str {
        MODEL_EVALUATION
    }

    fn spec(&self) -> TaskSpec {
        let mut fields = FieldMap::new();
        fields.insert("test_size".to_string(), FieldValue::Int(self.test_size as i64));
        TaskSpec::new(MODEL_EVALUATION, self.name.clone(), self.priority, fields)
    }

    fn execute(&self) -> String {
        thread::sleep(priority_delay(self.priority, [80, 150, 250]));

        let mut rng = rand::thread_rng();
        // Score test_size pretend predictions, then report aggregates.
        let mut correct = 0usize;
        for _ in 0..self.test_size {
            if rng.gen_range(0.0..1.0) < rng.gen_range(0.85..0.95) {
                correct += 1;
            }
        }
        let accuracy = correct as f64 / self.test_size.max(1) as f64;
        let loss = rng.gen_range(0.1..0.3);

        format!("{} - accuracy: {:.3}, loss: {:.3}", self.name, accuracy, loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_roundtrip_every_kind() {
        let registry = default_registry();

        let units: Vec<Box<dyn WorkUnit>> = vec![
            Box::new(ModelTrainingTask::new("t", Priority::High, 100, 5)),
            Box::new(DataAggregationTask::new("d", Priority::Medium, 40)),
            Box::new(ModelEvaluationTask::new("e", Priority::Low, 25)),
        ];

        for unit in units {
            let spec = unit.spec();
            let rebuilt = registry.build(&spec).unwrap();
            assert_eq!(rebuilt.kind(), unit.kind());
            assert_eq!(rebuilt.spec(), spec);
        }
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let spec = TaskSpec::new(MODEL_TRAINING, "broken", Priority::High, FieldMap::new());
        assert!(ModelTrainingTask::from_spec(&spec).is_err());
    }

    #[test]
    fn test_demo_tasks_shape() {
        let tasks = demo_tasks();
        assert_eq!(tasks.len(), 8);

        let registry = default_registry();
        for task in &tasks {
            assert!(registry.has_kind(&task.kind));
        }

        let high = tasks.iter().filter(|t| t.priority == Priority::High).count();
        let medium = tasks.iter().filter(|t| t.priority == Priority::Medium).count();
        let low = tasks.iter().filter(|t| t.priority == Priority::Low).count();
        assert_eq!((high, medium, low), (2, 3, 3));
    }

    #[test]
    fn test_evaluation_summary_format() {
        let unit = ModelEvaluationTask::new("eval", Priority::High, 10);
        let summary = unit.execute();
        assert!(summary.starts_with("eval - accuracy: "));
        assert!(summary.contains("loss: "));
    }
}
