//! Exhaustive search over client assignments, centers and visiting orders.
//!
//! Clients, vehicles and centers are indexed in id order, so index order and
//! lexicographic id order coincide. Client sets are bit masks; the client
//! ceiling keeps them within a `u32`.

use std::collections::HashMap;

use depotflow_core::{Center, Client, Instance, Vehicle, arc_cost};

/// Slack allowed when comparing against capacity, range and duration limits.
pub(crate) const FEASIBILITY_SLACK: f64 = 1e-9;

/// One precomputed arc as seen by one vehicle.
#[derive(Debug, Clone, Copy)]
struct Leg {
    distance: f64,
    /// Travel time plus service time at the destination.
    duration: f64,
    cost: f64,
}

/// Cheapest visiting order for one vehicle, center and client set.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteChoice {
    pub(crate) cost: f64,
    pub(crate) order: Vec<usize>,
}

/// Tie-break key of one vehicle. Dispatched vehicles sort before idle ones,
/// then by center and visiting order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum VehicleChoice {
    Route { center: usize, order: Vec<usize> },
    Idle,
}

/// A complete plan: one choice per vehicle in index order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Plan {
    pub(crate) cost: f64,
    pub(crate) choices: Vec<VehicleChoice>,
}

/// Routes one dispatched vehicle could drive, one per usable center.
#[derive(Debug, Clone)]
struct VehicleOptions {
    vehicle: usize,
    demand: f64,
    routes: Vec<(usize, RouteChoice)>,
}

/// Counters reported after a search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub(crate) assignments: u64,
    pub(crate) routes_evaluated: u64,
    pub(crate) plans_compared: u64,
}

const fn bit(client: usize) -> u32 {
    1_u32 << client
}

fn members(mask: u32, count: usize) -> impl Iterator<Item = usize> {
    (0..count).filter(move |&client| mask & bit(client) != 0)
}

pub(crate) struct Search<'a> {
    instance: &'a Instance,
    clients: Vec<&'a Client>,
    vehicles: Vec<&'a Vehicle>,
    centers: Vec<&'a Center>,
    candidates: Vec<Vec<usize>>,
    allowed: Vec<u32>,
    legs: Vec<Vec<Option<Leg>>>,
    memo: HashMap<(usize, usize, u32), Option<RouteChoice>>,
    tie_epsilon: f64,
    best: Option<Plan>,
    stats: SearchStats,
}

impl<'a> Search<'a> {
    pub(crate) fn new(instance: &'a Instance, tie_epsilon: f64) -> Self {
        let clients: Vec<&Client> = instance.clients().collect();
        let vehicles: Vec<&Vehicle> = instance.vehicles().collect();
        let centers: Vec<&Center> = instance.centers().collect();
        let nodes: Vec<(&str, f64, bool)> = centers
            .iter()
            .map(|center| (center.id.as_str(), 0.0, true))
            .chain(
                clients
                    .iter()
                    .map(|client| (client.id.as_str(), client.service_time, false)),
            )
            .collect();

        let candidates = vehicles
            .iter()
            .map(|vehicle| {
                let usable: Vec<_> = instance.candidate_centers(vehicle).collect();
                centers
                    .iter()
                    .enumerate()
                    .filter(|(_, center)| usable.iter().any(|u| u.id == center.id))
                    .map(|(index, _)| index)
                    .collect()
            })
            .collect();
        let allowed = vehicles
            .iter()
            .map(|vehicle| {
                clients
                    .iter()
                    .enumerate()
                    .filter(|(_, client)| {
                        instance.is_allowed(client.id.as_str(), vehicle.id.as_str())
                    })
                    .fold(0, |mask, (index, _)| mask | bit(index))
            })
            .collect();
        let legs = vehicles
            .iter()
            .map(|vehicle| {
                let mut matrix = Vec::with_capacity(nodes.len() * nodes.len());
                for &(origin, _, origin_is_center) in &nodes {
                    for &(destination, service, destination_is_center) in &nodes {
                        let leg = instance
                            .arc(origin, destination)
                            .filter(|_| !(origin_is_center && destination_is_center))
                            .map(|arc| Leg {
                                distance: arc.distance,
                                duration: arc.time + service,
                                cost: arc_cost(vehicle, arc, instance.economics()),
                            });
                        matrix.push(leg);
                    }
                }
                matrix
            })
            .collect();

        Self {
            instance,
            clients,
            vehicles,
            centers,
            candidates,
            allowed,
            legs,
            memo: HashMap::new(),
            tie_epsilon,
            best: None,
            stats: SearchStats::default(),
        }
    }

    pub(crate) const fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub(crate) fn clients(&self) -> &[&'a Client] {
        &self.clients
    }

    pub(crate) fn vehicles(&self) -> &[&'a Vehicle] {
        &self.vehicles
    }

    pub(crate) fn centers(&self) -> &[&'a Center] {
        &self.centers
    }

    pub(crate) const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Whether some vehicle can serve `client` alone from some center.
    pub(crate) fn can_serve_alone(&mut self, client: usize) -> bool {
        let Some(demand) = self.clients.get(client).map(|c| c.demand) else {
            return false;
        };
        for vehicle in 0..self.vehicles.len() {
            if !self.may_carry(vehicle, client, demand) {
                continue;
            }
            let centers = self.candidates.get(vehicle).cloned().unwrap_or_default();
            for center in centers {
                let roomy = self
                    .centers
                    .get(center)
                    .is_some_and(|c| demand <= c.capacity + FEASIBILITY_SLACK);
                if roomy && self.best_route(vehicle, center, bit(client)).is_some() {
                    return true;
                }
            }
        }
        false
    }

    /// Access and capacity check for adding `client` to a load of `demand`.
    fn may_carry(&self, vehicle: usize, client: usize, demand: f64) -> bool {
        let permitted = self
            .allowed
            .get(vehicle)
            .is_some_and(|mask| mask & bit(client) != 0);
        permitted
            && self
                .vehicles
                .get(vehicle)
                .is_some_and(|v| demand <= v.capacity + FEASIBILITY_SLACK)
    }

    /// Run the full search and return the optimal plan, if any.
    pub(crate) fn run(&mut self) -> Option<Plan> {
        let mut masks = vec![0_u32; self.vehicles.len()];
        let mut loads = vec![0.0; self.vehicles.len()];
        self.assign(0, &mut masks, &mut loads);
        self.best.take()
    }

    fn assign(&mut self, client: usize, masks: &mut [u32], loads: &mut [f64]) {
        let Some(current) = self.clients.get(client).copied() else {
            self.stats.assignments += 1;
            self.evaluate(masks, loads);
            return;
        };
        for vehicle in 0..self.vehicles.len() {
            let (Some(mask), Some(load)) =
                (masks.get(vehicle).copied(), loads.get(vehicle).copied())
            else {
                continue;
            };
            let carried = load + current.demand;
            if !self.may_carry(vehicle, client, carried) {
                continue;
            }
            set(masks, vehicle, mask | bit(client));
            set(loads, vehicle, carried);
            self.assign(client + 1, masks, loads);
            set(masks, vehicle, mask);
            set(loads, vehicle, load);
        }
    }

    /// Pick centers for every dispatched vehicle of one assignment.
    fn evaluate(&mut self, masks: &[u32], loads: &[f64]) {
        let mut options = Vec::new();
        for (vehicle, &mask) in masks.iter().enumerate() {
            if mask == 0 {
                continue;
            }
            let centers = self.candidates.get(vehicle).cloned().unwrap_or_default();
            let routes: Vec<(usize, RouteChoice)> = centers
                .into_iter()
                .filter_map(|center| {
                    self.best_route(vehicle, center, mask)
                        .map(|route| (center, route))
                })
                .collect();
            if routes.is_empty() {
                return;
            }
            options.push(VehicleOptions {
                vehicle,
                demand: loads.get(vehicle).copied().unwrap_or(0.0),
                routes,
            });
        }

        let mut remaining: Vec<f64> = self.centers.iter().map(|c| c.capacity).collect();
        let mut picks = Vec::with_capacity(options.len());
        self.choose_centers(&options, &mut remaining, &mut picks, 0.0);
    }

    fn choose_centers(
        &mut self,
        options: &[VehicleOptions],
        remaining: &mut [f64],
        picks: &mut Vec<usize>,
        cost: f64,
    ) {
        if let Some(best) = &self.best
            && cost > best.cost + self.epsilon(best.cost)
        {
            return;
        }
        let Some(VehicleOptions { demand, routes, .. }) = options.get(picks.len()) else {
            self.offer(options, picks, cost);
            return;
        };
        for (pick, (center, route)) in routes.iter().enumerate() {
            let Some(room) = remaining.get(*center).copied() else {
                continue;
            };
            if *demand > room + FEASIBILITY_SLACK {
                continue;
            }
            set(remaining, *center, room - demand);
            picks.push(pick);
            self.choose_centers(options, remaining, picks, cost + route.cost);
            picks.pop();
            set(remaining, *center, room);
        }
    }

    fn offer(&mut self, options: &[VehicleOptions], picks: &[usize], cost: f64) {
        self.stats.plans_compared += 1;
        let mut choices = vec![VehicleChoice::Idle; self.vehicles.len()];
        for (option, &pick) in options.iter().zip(picks) {
            if let (Some(slot), Some((center, route))) =
                (choices.get_mut(option.vehicle), option.routes.get(pick))
            {
                *slot = VehicleChoice::Route {
                    center: *center,
                    order: route.order.clone(),
                };
            }
        }
        let candidate = Plan { cost, choices };
        let better = self.best.as_ref().is_none_or(|best| {
            let epsilon = self.epsilon(best.cost);
            cost < best.cost - epsilon
                || (cost <= best.cost + epsilon && candidate.choices < best.choices)
        });
        if better {
            self.best = Some(candidate);
        }
    }

    const fn epsilon(&self, reference: f64) -> f64 {
        self.tie_epsilon * reference.abs().max(1.0)
    }

    /// Cheapest feasible order for `vehicle` serving `mask` from `center`.
    ///
    /// Orders are explored in lexicographic order and only strictly cheaper
    /// ones replace the incumbent, so ties keep the smallest sequence.
    fn best_route(&mut self, vehicle: usize, center: usize, mask: u32) -> Option<RouteChoice> {
        let key = (vehicle, center, mask);
        if let Some(known) = self.memo.get(&key) {
            return known.clone();
        }
        self.stats.routes_evaluated += 1;
        let found = self.vehicles.get(vehicle).and_then(|fleet_vehicle| {
            let legs = self.legs.get(vehicle)?;
            let mut search = OrderSearch {
                legs,
                nodes: self.centers.len() + self.clients.len(),
                offset: self.centers.len(),
                clients: self.clients.len(),
                center,
                range: fleet_vehicle.range,
                max_duration: fleet_vehicle.max_duration,
                fixed_cost: fleet_vehicle.fixed_cost,
                tie_epsilon: self.tie_epsilon,
                order: Vec::new(),
                best: None,
            };
            search.extend(center, mask, 0.0, 0.0, 0.0);
            search.best
        });
        self.memo.insert(key, found.clone());
        found
    }
}

fn set<T: Copy>(values: &mut [T], index: usize, value: T) {
    if let Some(slot) = values.get_mut(index) {
        *slot = value;
    }
}

/// Depth-first enumeration of visiting orders for one route.
struct OrderSearch<'s> {
    legs: &'s [Option<Leg>],
    nodes: usize,
    offset: usize,
    clients: usize,
    center: usize,
    range: f64,
    max_duration: f64,
    fixed_cost: f64,
    tie_epsilon: f64,
    order: Vec<usize>,
    best: Option<RouteChoice>,
}

impl OrderSearch<'_> {
    fn leg(&self, from: usize, to: usize) -> Option<Leg> {
        self.legs.get(from * self.nodes + to).copied().flatten()
    }

    const fn within_limits(&self, distance: f64, duration: f64) -> bool {
        distance <= self.range + FEASIBILITY_SLACK
            && duration <= self.max_duration + FEASIBILITY_SLACK
    }

    fn extend(&mut self, at: usize, remaining: u32, distance: f64, duration: f64, cost: f64) {
        if remaining == 0 {
            self.close(at, distance, duration, cost);
            return;
        }
        for client in members(remaining, self.clients) {
            let node = self.offset + client;
            let Some(leg) = self.leg(at, node) else {
                continue;
            };
            let (reach, elapsed) = (distance + leg.distance, duration + leg.duration);
            if !self.within_limits(reach, elapsed) {
                continue;
            }
            self.order.push(client);
            self.extend(node, remaining & !bit(client), reach, elapsed, cost + leg.cost);
            self.order.pop();
        }
    }

    fn close(&mut self, at: usize, distance: f64, duration: f64, cost: f64) {
        let Some(leg) = self.leg(at, self.center) else {
            return;
        };
        if !self.within_limits(distance + leg.distance, duration + leg.duration) {
            return;
        }
        let total = cost + leg.cost + self.fixed_cost;
        let improves = self.best.as_ref().is_none_or(|best| {
            total < best.cost - self.tie_epsilon * best.cost.abs().max(1.0)
        });
        if improves {
            self.best = Some(RouteChoice {
                cost: total,
                order: self.order.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use depotflow_core::test_support::{RecordsBuilder, single_route_records, vehicle};
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn members_lists_set_bits_in_order() {
        let listed: Vec<usize> = members(0b1011, 4).collect();
        assert_eq!(listed, [0, 1, 3]);
    }

    #[rstest]
    fn choices_prefer_dispatch_then_smaller_sequences() {
        let route = |center, order: &[usize]| VehicleChoice::Route {
            center,
            order: order.to_vec(),
        };
        assert!(route(0, &[1, 0]) < VehicleChoice::Idle);
        assert!(route(0, &[0, 1]) < route(0, &[1, 0]));
        assert!(route(0, &[5]) < route(1, &[0]));
    }

    #[rstest]
    fn equal_cost_orders_keep_lexicographic_first() {
        let instance = Instance::from_records(single_route_records()).expect("valid instance");
        let mut search = Search::new(&instance, 1e-9);
        let route = search.best_route(0, 0, 0b11).expect("feasible route");
        assert_eq!(route.order, [0, 1]);
        assert!((route.cost - 66.2).abs() < 1e-9);
        let again = search.best_route(0, 0, 0b11).expect("memoised route");
        assert_eq!(again, route);
        assert_eq!(search.stats().routes_evaluated, 1);
    }

    #[rstest]
    fn asymmetric_distances_pick_cheaper_direction() {
        let mut records = RecordsBuilder::new()
            .center("CD1", 100.0, 0.0, 0.0)
            .client("CL1", 10.0, 3.0, 0.0)
            .client("CL2", 10.0, 3.0, 4.0)
            .vehicle(vehicle("V1", 50.0, 500.0, 8.0))
            .records();
        for arc in &mut records.arcs {
            if arc.origin == "CD1" && arc.destination == "CL1" {
                arc.distance += 10.0;
            }
        }
        let instance = Instance::from_records(records).expect("valid instance");
        let mut search = Search::new(&instance, 1e-9);
        let route = search.best_route(0, 0, 0b11).expect("feasible route");
        assert_eq!(route.order, [1, 0]);
    }

    #[rstest]
    fn range_prunes_every_order() {
        let instance = RecordsBuilder::new()
            .center("CD1", 100.0, 0.0, 0.0)
            .client("CL1", 10.0, 3.0, 0.0)
            .client("CL2", 10.0, 3.0, 4.0)
            .vehicle(vehicle("V1", 50.0, 11.0, 8.0))
            .build()
            .expect("valid instance");
        let mut search = Search::new(&instance, 1e-9);
        assert!(search.best_route(0, 0, 0b11).is_none());
        assert!(search.best_route(0, 0, 0b01).is_some());
        assert!(search.can_serve_alone(1));
    }
}
