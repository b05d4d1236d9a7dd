use serde::Serialize;

use super::*;

/// Number and fraction of edges in one [`EdgeClass`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeClassCount {
    pub class: EdgeClass,
    pub count: usize,
    pub fraction: f64,
}

/// Summary of a calculated model: driver nodes and, if the model supports it, the
/// distribution of edge classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlStatistics {
    pub model: ModelKind,
    pub nodes: NumNodes,
    pub edges: NumEdges,
    pub driver_nodes: usize,
    pub driver_node_fraction: f64,
    pub controllability: f64,
    /// Ordered as in [`EdgeClass::ALL`]; empty if edge classes are not supported
    pub edge_classes: Vec<EdgeClassCount>,
}

impl ControlStatistics {
    /// Collects the statistics of a model on which `calculate` has been called
    pub fn from_model(model: &dyn ControllabilityModel<'_>) -> Result<Self> {
        let graph = model.graph().ok_or(crate::ControlError::NoGraphAttached)?;
        let m = graph.number_of_edges() as usize;

        let edge_classes = if model.supports_edge_classes() {
            let classes = model.edge_classes()?;
            EdgeClass::ALL
                .into_iter()
                .map(|class| {
                    let count = classes.iter().filter(|&&c| c == class).count();
                    EdgeClassCount {
                        class,
                        count,
                        fraction: fraction(count, m),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            model: model.kind(),
            nodes: graph.number_of_nodes(),
            edges: graph.number_of_edges(),
            driver_nodes: model.driver_nodes().len(),
            driver_node_fraction: fraction(model.driver_nodes().len(), graph.len()),
            controllability: model.controllability(),
            edge_classes,
        })
    }
}

/// Two lines, counts first and fractions second, each listing the driver nodes followed by
/// the edge classes in the order of [`EdgeClass::ALL`]. Unsupported edge classes count as zero.
impl fmt::Display for ControlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = |i: usize| {
            self.edge_classes
                .get(i)
                .map_or((0, 0.0), |c| (c.count, c.fraction))
        };

        write!(f, "{}", self.driver_nodes)?;
        for i in 0..EdgeClass::ALL.len() {
            write!(f, " {}", counts(i).0)?;
        }
        writeln!(f)?;

        write!(f, "{}", self.driver_node_fraction)?;
        for i in 0..EdgeClass::ALL.len() {
            write!(f, " {}", counts(i).1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_of_liu_model() {
        let graph = Network::from_edges(3, [(0, 1), (0, 2)]);
        let mut model = LiuControllabilityModel::new().with_graph(&graph);
        model.calculate().unwrap();

        let stats = ControlStatistics::from_model(&model).unwrap();
        assert_eq!(stats.model, ModelKind::Liu);
        assert_eq!(stats.driver_nodes, 2);
        assert_eq!(stats.edge_classes.len(), 4);

        let ordinary = stats.edge_classes[2];
        assert_eq!(ordinary.class, EdgeClass::Ordinary);
        assert_eq!(ordinary.count, 2);
        assert_eq!(ordinary.fraction, 1.0);
        assert_eq!(
            stats.to_string(),
            format!("2 0 0 2 0\n{} 0 0 1 0", 2.0 / 3.0)
        );
    }

    #[test]
    fn targeted_model_has_no_edge_classes() {
        let graph = Network::from_edges(3, [(0, 1), (1, 2)]);
        let targets = [2];
        let mut model = LiuControllabilityModel::new()
            .with_graph(&graph)
            .with_targets(&targets);
        model.calculate().unwrap();

        let stats = ControlStatistics::from_model(&model).unwrap();
        assert!(stats.edge_classes.is_empty());
        assert_eq!(stats.to_string(), format!("1 0 0 0 0\n{} 0 0 0 0", 1.0 / 3.0));
    }

    #[test]
    fn serializes_to_json() {
        let graph = Network::from_edges(2, [(0, 1), (1, 0)]);
        let mut model = SwitchboardControllabilityModel::new().with_graph(&graph);
        model.calculate().unwrap();

        let stats = ControlStatistics::from_model(&model).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["model"], "switchboard");
        assert_eq!(json["driver_nodes"], 1);
        assert_eq!(json["edge_classes"][0]["class"], "distinguished");
    }
}
