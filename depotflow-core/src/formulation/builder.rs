//! Translate an [`Instance`] into variables and constraints.

use std::collections::{BTreeMap, BTreeSet};

use super::Formulation;
use super::model::{
    Constraint, ConstraintFamily, LinearTerm, Sense, VarId, Variable, VariableKind, VariableRole,
};
use crate::{Arc, Instance, NodeId, Vehicle, arc_cost};

/// `x` and `y` variables of one vehicle on one arc.
#[derive(Debug, Clone, Copy)]
struct ArcVars<'a> {
    arc: &'a Arc,
    traverse: VarId,
    load: VarId,
}

#[derive(Debug, Default)]
struct Builder<'a> {
    formulation: Formulation,
    visit_in: BTreeMap<&'a NodeId, Vec<VarId>>,
    visit_out: BTreeMap<&'a NodeId, Vec<VarId>>,
    launched_load: BTreeMap<&'a NodeId, Vec<VarId>>,
}

pub(super) fn build(instance: &Instance) -> Formulation {
    let mut builder = Builder::default();
    for vehicle in instance.vehicles() {
        builder.add_vehicle(instance, vehicle);
    }
    builder.add_global(instance);
    let formulation = builder.formulation;
    log::debug!(
        "formulation built: {} variables, {} constraints",
        formulation.variables.len(),
        formulation.constraints.len()
    );
    formulation
}

const fn term(var: VarId, coefficient: f64) -> LinearTerm {
    LinearTerm { var, coefficient }
}

/// Arcs the vehicle may use: both endpoints accessible, at most one endpoint
/// a center, and that center among the vehicle's candidates.
fn usable_arcs<'a>(
    instance: &'a Instance,
    vehicle: &Vehicle,
    centers: &BTreeSet<&NodeId>,
) -> Vec<&'a Arc> {
    let usable = |node: &NodeId| {
        if instance.is_center(node.as_str()) {
            centers.contains(node)
        } else {
            instance.is_allowed(node.as_str(), vehicle.id.as_str())
        }
    };
    instance
        .arcs()
        .iter()
        .filter(|arc| {
            !(instance.is_center(arc.origin.as_str()) && instance.is_center(arc.destination.as_str()))
        })
        .filter(|arc| usable(&arc.origin) && usable(&arc.destination))
        .collect()
}

impl<'a> Builder<'a> {
    fn variable(
        &mut self,
        name: String,
        kind: VariableKind,
        bounds: (f64, f64),
        objective: f64,
        role: VariableRole,
    ) -> VarId {
        let id = VarId::new(self.formulation.variables.len());
        self.formulation.variables.push(Variable {
            id,
            name,
            kind,
            lower: bounds.0,
            upper: bounds.1,
            objective,
            role,
        });
        id
    }

    fn constraint(
        &mut self,
        name: String,
        family: ConstraintFamily,
        terms: Vec<LinearTerm>,
        sense: Sense,
        rhs: f64,
    ) {
        self.formulation.constraints.push(Constraint {
            name,
            family,
            terms,
            sense,
            rhs,
        });
    }

    fn add_vehicle(&mut self, instance: &'a Instance, vehicle: &'a Vehicle) {
        let k = &vehicle.id;
        let centers: BTreeSet<&NodeId> = instance
            .candidate_centers(vehicle)
            .map(|center| &center.id)
            .collect();

        let mut inbound: BTreeMap<&NodeId, Vec<ArcVars<'a>>> = BTreeMap::new();
        let mut outbound: BTreeMap<&NodeId, Vec<ArcVars<'a>>> = BTreeMap::new();
        for arc in usable_arcs(instance, vehicle, &centers) {
            let (i, j) = (&arc.origin, &arc.destination);
            let traverse = self.variable(
                format!("x[{k},{i},{j}]"),
                VariableKind::Binary,
                (0.0, 1.0),
                arc_cost(vehicle, arc, instance.economics()),
                VariableRole::Traverse {
                    vehicle: k.clone(),
                    origin: i.clone(),
                    destination: j.clone(),
                },
            );
            let load = self.variable(
                format!("y[{k},{i},{j}]"),
                VariableKind::Continuous,
                (0.0, vehicle.capacity),
                0.0,
                VariableRole::Load {
                    vehicle: k.clone(),
                    origin: i.clone(),
                    destination: j.clone(),
                },
            );
            self.formulation
                .traverse
                .insert((k.clone(), i.clone(), j.clone()), traverse);
            self.formulation
                .load
                .insert((k.clone(), i.clone(), j.clone()), load);
            let vars = ArcVars {
                arc,
                traverse,
                load,
            };
            outbound.entry(i).or_default().push(vars);
            inbound.entry(j).or_default().push(vars);
        }

        let active = self.variable(
            format!("u[{k}]"),
            VariableKind::Binary,
            (0.0, 1.0),
            vehicle.fixed_cost,
            VariableRole::Active { vehicle: k.clone() },
        );
        self.formulation.active.insert(k.clone(), active);

        let mut launches = Vec::with_capacity(centers.len());
        for &center in &centers {
            let launch = self.variable(
                format!("z[{center},{k}]"),
                VariableKind::Binary,
                (0.0, 1.0),
                0.0,
                VariableRole::Launch {
                    center: center.clone(),
                    vehicle: k.clone(),
                },
            );
            self.formulation
                .launch
                .insert((center.clone(), k.clone()), launch);
            launches.push((center, launch));
        }

        self.add_arc_constraints(instance, vehicle, &inbound, &outbound);
        self.add_client_constraints(instance, vehicle, &inbound, &outbound);
        self.add_center_constraints(vehicle, &launches, active, &inbound, &outbound);
        self.add_resource_constraints(instance, vehicle, &outbound);
    }

    fn add_arc_constraints(
        &mut self,
        instance: &Instance,
        vehicle: &Vehicle,
        inbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
        outbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
    ) {
        let k = &vehicle.id;
        for vars in outbound.values().flatten() {
            let (i, j) = (&vars.arc.origin, &vars.arc.destination);
            self.constraint(
                format!("ArcCapacity[{k},{i},{j}]"),
                ConstraintFamily::ArcCapacity,
                vec![term(vars.load, 1.0), term(vars.traverse, -vehicle.capacity)],
                Sense::LessEqual,
                0.0,
            );
        }
        for (node, arriving) in inbound {
            if !instance.is_center(node.as_str()) {
                continue;
            }
            for vars in arriving {
                let i = &vars.arc.origin;
                self.constraint(
                    format!("ReturnEmpty[{k},{i},{node}]"),
                    ConstraintFamily::ReturnEmpty,
                    vec![term(vars.load, 1.0)],
                    Sense::Equal,
                    0.0,
                );
            }
        }
    }

    fn add_client_constraints(
        &mut self,
        instance: &'a Instance,
        vehicle: &Vehicle,
        inbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
        outbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
    ) {
        let k = &vehicle.id;
        for client in instance.clients() {
            let id = &client.id;
            let arriving = inbound.get(id).map_or(&[][..], Vec::as_slice);
            let leaving = outbound.get(id).map_or(&[][..], Vec::as_slice);
            self.visit_in
                .entry(id)
                .or_default()
                .extend(arriving.iter().map(|vars| vars.traverse));
            self.visit_out
                .entry(id)
                .or_default()
                .extend(leaving.iter().map(|vars| vars.traverse));
            if arriving.is_empty() && leaving.is_empty() {
                continue;
            }

            let continuity = arriving
                .iter()
                .map(|vars| term(vars.traverse, 1.0))
                .chain(leaving.iter().map(|vars| term(vars.traverse, -1.0)))
                .collect();
            self.constraint(
                format!("Continuity[{k},{id}]"),
                ConstraintFamily::Continuity,
                continuity,
                Sense::Equal,
                0.0,
            );

            let conservation = arriving
                .iter()
                .flat_map(|vars| {
                    [
                        term(vars.load, 1.0),
                        term(vars.traverse, -client.demand),
                    ]
                })
                .chain(leaving.iter().map(|vars| term(vars.load, -1.0)))
                .collect();
            self.constraint(
                format!("FlowConservation[{k},{id}]"),
                ConstraintFamily::FlowConservation,
                conservation,
                Sense::Equal,
                0.0,
            );
        }
    }

    fn add_center_constraints(
        &mut self,
        vehicle: &Vehicle,
        launches: &[(&'a NodeId, VarId)],
        active: VarId,
        inbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
        outbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
    ) {
        let k = &vehicle.id;
        for &(center, launch) in launches {
            let leaving = outbound.get(center).map_or(&[][..], Vec::as_slice);
            let arriving = inbound.get(center).map_or(&[][..], Vec::as_slice);

            let mut start: Vec<LinearTerm> =
                leaving.iter().map(|vars| term(vars.traverse, 1.0)).collect();
            start.push(term(launch, -1.0));
            self.constraint(
                format!("StartAtCenter[{k},{center}]"),
                ConstraintFamily::StartAtCenter,
                start,
                Sense::Equal,
                0.0,
            );

            let mut end: Vec<LinearTerm> =
                arriving.iter().map(|vars| term(vars.traverse, 1.0)).collect();
            end.push(term(launch, -1.0));
            self.constraint(
                format!("EndAtCenter[{k},{center}]"),
                ConstraintFamily::EndAtCenter,
                end,
                Sense::Equal,
                0.0,
            );

            self.launched_load
                .entry(center)
                .or_default()
                .extend(leaving.iter().map(|vars| vars.load));
        }

        let mut one_center: Vec<LinearTerm> = launches
            .iter()
            .map(|&(_, launch)| term(launch, 1.0))
            .collect();
        one_center.push(term(active, -1.0));
        self.constraint(
            format!("OneCenter[{k}]"),
            ConstraintFamily::OneCenter,
            one_center,
            Sense::Equal,
            0.0,
        );
    }

    fn add_resource_constraints(
        &mut self,
        instance: &Instance,
        vehicle: &Vehicle,
        outbound: &BTreeMap<&NodeId, Vec<ArcVars<'a>>>,
    ) {
        let k = &vehicle.id;
        let all = || outbound.values().flatten();
        let range = all()
            .map(|vars| term(vars.traverse, vars.arc.distance))
            .collect();
        self.constraint(
            format!("Range[{k}]"),
            ConstraintFamily::Range,
            range,
            Sense::LessEqual,
            vehicle.range,
        );

        let duration = all()
            .map(|vars| {
                let service = instance
                    .client(vars.arc.destination.as_str())
                    .map_or(0.0, |client| client.service_time);
                term(vars.traverse, vars.arc.time + service)
            })
            .collect();
        self.constraint(
            format!("Duration[{k}]"),
            ConstraintFamily::Duration,
            duration,
            Sense::LessEqual,
            vehicle.max_duration,
        );
    }

    fn add_global(&mut self, instance: &Instance) {
        for client in instance.clients() {
            let id = &client.id;
            let arriving = self.visit_in.remove(id).unwrap_or_default();
            let leaving = self.visit_out.remove(id).unwrap_or_default();
            self.constraint(
                format!("VisitIn[{id}]"),
                ConstraintFamily::VisitIn,
                arriving.into_iter().map(|var| term(var, 1.0)).collect(),
                Sense::Equal,
                1.0,
            );
            self.constraint(
                format!("VisitOut[{id}]"),
                ConstraintFamily::VisitOut,
                leaving.into_iter().map(|var| term(var, 1.0)).collect(),
                Sense::Equal,
                1.0,
            );
        }

        let mut cover = Vec::new();
        for center in instance.centers() {
            let c = &center.id;
            let supply = self.variable(
                format!("s[{c}]"),
                VariableKind::Continuous,
                (0.0, center.capacity),
                0.0,
                VariableRole::Supply { center: c.clone() },
            );
            self.formulation.supply.insert(c.clone(), supply);
            cover.push(term(supply, 1.0));

            let mut balance: Vec<LinearTerm> = self
                .launched_load
                .remove(c)
                .unwrap_or_default()
                .into_iter()
                .map(|var| term(var, 1.0))
                .collect();
            balance.push(term(supply, -1.0));
            self.constraint(
                format!("CenterBalance[{c}]"),
                ConstraintFamily::CenterBalance,
                balance,
                Sense::Equal,
                0.0,
            );
            self.constraint(
                format!("CenterCapacity[{c}]"),
                ConstraintFamily::CenterCapacity,
                vec![term(supply, 1.0)],
                Sense::LessEqual,
                center.capacity,
            );
        }
        self.constraint(
            "SupplyCover".to_owned(),
            ConstraintFamily::SupplyCover,
            cover,
            Sense::Equal,
            instance.total_demand(),
        );
    }
}
