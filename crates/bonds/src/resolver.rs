// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::{is_bonded, ResolverConfig, ResolverError};
use cell::{
    Atom, AtomEvent, AtomId, Bond, Cell, CellEvent, CellListener, EventSource, ListenerContext,
    ListenerId,
};
use common::CellId;
use indexmap::IndexSet;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use ultraviolet::DVec3;

/// State shared between the resolver handle and the listener registered on the cell.
struct Shared {
    config: ResolverConfig,
    auto: AtomicBool,
    // Only built when more than one worker thread is configured.
    pool: Option<rayon::ThreadPool>,
}

/// Maintains the bond graph of one cell.
///
/// [`BondsResolver::attach`] registers a listener on the cell that reacts to changes while
/// `auto` is on:
///
/// | change | reaction |
/// |---|---|
/// | lattice replaced | full rescan, queued on the cell's task queue |
/// | atom added | subscribe to the atom, then rescan that atom |
/// | atom removed | drop every bond linked with it |
/// | atom renamed to a different name | rescan that atom |
/// | atom moved by at least `motion_threshold` | rescan that atom |
/// | bond added or removed | nothing |
///
/// Newly added atoms are subscribed to even while `auto` is off, so their later moves and renames
/// are seen once it is switched back on. The handle is cheap to clone; clones share the `auto`
/// flag with the registered listener.
#[derive(Clone)]
pub struct BondsResolver {
    shared: Arc<Shared>,
    cell: CellId,
    listener: ListenerId,
}

impl std::fmt::Debug for BondsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BondsResolver")
            .field("cell", &self.cell)
            .field("listener", &self.listener)
            .field("auto", &self.is_auto())
            .field("config", &self.shared.config)
            .finish()
    }
}

impl BondsResolver {
    /// Validates `config`, starts the worker pool if one is configured, and registers the
    /// resolver ahead of every other listener on `cell` and on each of its atoms. `auto` starts
    /// out on. No bonds are resolved until something changes or [`BondsResolver::resolve`] is
    /// called.
    pub fn attach(cell: &mut Cell, config: ResolverConfig) -> Result<Self, ResolverError> {
        config.validate()?;

        let pool = if config.num_threads > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.num_threads)
                    .thread_name(|index| format!("bond-resolver-{index}"))
                    .build()?,
            )
        } else {
            None
        };

        let shared = Arc::new(Shared {
            config,
            auto: AtomicBool::new(true),
            pool,
        });

        let listener = cell.add_listener_first(Box::new(ResolverListener {
            shared: shared.clone(),
            cell: cell.id(),
        }));
        let atoms: Vec<AtomId> = cell.atom_ids().collect();
        for atom in atoms {
            // Every id was just read from the cell, so subscribing cannot fail.
            let _ = cell.subscribe_atom_first(atom, listener);
        }

        log::debug!(
            "bond resolver attached to cell {} with {} worker thread(s)",
            cell.id().get(),
            config.num_threads
        );

        Ok(Self {
            shared,
            cell: cell.id(),
            listener,
        })
    }

    /// Unregisters the resolver from `cell`. Full rescans already queued still run.
    pub fn detach(self, cell: &mut Cell) -> bool {
        self.owns(cell) && cell.remove_listener(self.listener)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.shared.config
    }

    pub fn listener_id(&self) -> ListenerId {
        self.listener
    }

    pub fn set_auto(&self, auto: bool) {
        self.shared.auto.store(auto, Ordering::Relaxed);
    }

    pub fn is_auto(&self) -> bool {
        self.shared.auto.load(Ordering::Relaxed)
    }

    /// Queues a full rescan on the cell's task queue and returns at once. It runs when the
    /// owner drains the queue with [`Cell::run_pending`].
    pub fn resolve(&self, cell: &mut Cell) {
        if self.owns(cell) {
            schedule_resolve(cell, &self.shared);
        }
    }

    /// Runs a full rescan right away.
    pub fn resolve_now(&self, cell: &mut Cell) {
        if self.owns(cell) {
            resolve_all(cell, &self.shared);
        }
    }

    /// Rescans the bonds of one atom against every other atom.
    pub fn resolve_atom(&self, cell: &mut Cell, atom: AtomId) {
        if self.owns(cell) {
            resolve_one(cell, &self.shared.config, atom);
        }
    }

    /// Drops every bond with `atom` as an endpoint, whether or not the atom is still present.
    pub fn remove_all_bonds_linked_with(&self, cell: &mut Cell, atom: AtomId) {
        if self.owns(cell) {
            remove_all_bonds_linked_with(cell, atom);
        }
    }

    /// False when the cell has no positive volume or its atom density exceeds
    /// [`ResolverConfig::max_density`].
    pub fn is_able_to_resolve(&self, cell: &Cell) -> bool {
        is_able_to_resolve(cell, &self.shared.config)
    }

    fn owns(&self, cell: &Cell) -> bool {
        if cell.id() == self.cell {
            true
        } else {
            log::warn!(
                "bond resolver of cell {} asked to work on cell {}",
                self.cell.get(),
                cell.id().get()
            );
            false
        }
    }
}

struct ResolverListener {
    shared: Arc<Shared>,
    cell: CellId,
}

impl ResolverListener {
    fn auto(&self) -> bool {
        self.shared.auto.load(Ordering::Relaxed)
    }
}

impl CellListener for ResolverListener {
    fn on_cell_event(&mut self, cell: &mut Cell, ctx: &ListenerContext, event: &CellEvent) {
        if ctx.source != EventSource::Cell(self.cell) {
            return;
        }

        match event {
            CellEvent::LatticeMoved => {
                if self.auto() {
                    schedule_resolve(cell, &self.shared);
                }
            }
            CellEvent::AtomAdded(atom) => {
                if cell.subscribe_atom_first(*atom, ctx.listener).is_err() {
                    return;
                }
                if self.auto() {
                    resolve_one(cell, &self.shared.config, *atom);
                }
            }
            CellEvent::AtomRemoved(atom) => {
                if self.auto() {
                    remove_all_bonds_linked_with(cell, *atom);
                }
            }
            CellEvent::BondAdded(_) | CellEvent::BondRemoved(_) => {}
        }
    }

    fn on_atom_event(&mut self, cell: &mut Cell, ctx: &ListenerContext, event: &AtomEvent) {
        if !self.auto() {
            return;
        }

        let EventSource::Atom(atom) = ctx.source else {
            return;
        };

        match event {
            AtomEvent::Renamed { old_name, name } => {
                if old_name != name {
                    resolve_one(cell, &self.shared.config, atom);
                }
            }
            AtomEvent::Moved { delta } => {
                if delta.mag_sq() >= self.shared.config.motion_threshold_sq() {
                    resolve_one(cell, &self.shared.config, atom);
                }
            }
        }
    }
}

/// The part of an atom the bond test looks at, copied out of the cell so worker threads never
/// touch the cell itself.
#[derive(Clone, Copy)]
struct Site {
    id: AtomId,
    position: DVec3,
    radius: f64,
}

impl From<&Atom> for Site {
    fn from(atom: &Atom) -> Self {
        Self {
            id: atom.id(),
            position: atom.position(),
            radius: atom.radius(),
        }
    }
}

#[derive(Default)]
struct BondChanges {
    to_add: Vec<Bond>,
    to_remove: Vec<Bond>,
}

fn is_able_to_resolve(cell: &Cell, config: &ResolverConfig) -> bool {
    let volume = cell.volume();
    if volume.is_nan() || volume <= 0.0 {
        return false;
    }
    let density = cell.num_atoms() as f64 / volume;
    density <= config.max_density
}

fn schedule_resolve(cell: &mut Cell, shared: &Arc<Shared>) {
    let shared = shared.clone();
    cell.run_later(move |cell| resolve_all(cell, &shared));
}

/// Compares `site` against every other site. Pairs inside the window with no bond become
/// additions; bonds whose pair fell outside the window become removals. Passing no `existing`
/// bonds treats the cell as having none, which skips the lookups.
fn collect_changes(
    site: &Site,
    sites: &[Site],
    existing: Option<&IndexSet<Bond>>,
    config: &ResolverConfig,
    changes: &mut BondChanges,
) {
    for other in sites {
        if other.id == site.id {
            continue;
        }

        let rr = (site.position - other.position).mag_sq();
        let bond = Bond::new(site.id, other.id);
        let bonded = existing.map_or(false, |bonds| bonds.contains(&bond));

        if is_bonded(site.radius, other.radius, rr, config) {
            if !bonded {
                changes.to_add.push(bond);
            }
        } else if bonded {
            changes.to_remove.push(bond);
        }
    }
}

fn resolve_all(cell: &mut Cell, shared: &Shared) {
    remove_orphan_bonds(cell);

    if cell.num_atoms() == 0 {
        return;
    }

    let config = &shared.config;
    if !is_able_to_resolve(cell, config) {
        log::debug!(
            "skipping bond resolution: {} atoms in volume {}",
            cell.num_atoms(),
            cell.volume()
        );
        return;
    }

    let sites: Vec<Site> = cell.atoms().map(Site::from).collect();
    let existing = if cell.num_bonds() == 0 {
        None
    } else {
        Some(cell.bonds())
    };

    let changes = match &shared.pool {
        Some(pool) if sites.len() > config.parallel_min_atoms => {
            collect_changes_parallel(pool, &sites, existing, config)
        }
        _ => {
            let mut changes = BondChanges::default();
            for site in &sites {
                collect_changes(site, &sites, existing, config, &mut changes);
            }
            changes
        }
    };

    apply(cell, changes);
}

fn collect_changes_parallel(
    pool: &rayon::ThreadPool,
    sites: &[Site],
    existing: Option<&IndexSet<Bond>>,
    config: &ResolverConfig,
) -> BondChanges {
    let to_add = Mutex::new(Vec::new());
    let to_remove = Mutex::new(Vec::new());

    pool.install(|| {
        sites.par_iter().for_each(|site| {
            let mut local = BondChanges::default();
            collect_changes(site, sites, existing, config, &mut local);
            if !local.to_add.is_empty() {
                to_add.lock().extend(local.to_add);
            }
            if !local.to_remove.is_empty() {
                to_remove.lock().extend(local.to_remove);
            }
        });
    });

    BondChanges {
        to_add: to_add.into_inner(),
        to_remove: to_remove.into_inner(),
    }
}

fn resolve_one(cell: &mut Cell, config: &ResolverConfig, atom: AtomId) {
    if cell.num_atoms() == 0 || !is_able_to_resolve(cell, config) {
        return;
    }

    let Some(site) = cell.atom(atom).map(Site::from) else {
        return;
    };
    let sites: Vec<Site> = cell.atoms().map(Site::from).collect();

    let mut changes = BondChanges::default();
    collect_changes(&site, &sites, Some(cell.bonds()), config, &mut changes);
    apply(cell, changes);
}

/// Additions first, then removals. Duplicates are harmless: the cell ignores bonds it already
/// has and removals of bonds it no longer has.
fn apply(cell: &mut Cell, changes: BondChanges) {
    let mut added = 0;
    for bond in &changes.to_add {
        if cell.add_bond(bond.atom1(), bond.atom2()) {
            added += 1;
        }
    }

    let mut removed = 0;
    for bond in &changes.to_remove {
        if cell.remove_bond(bond) {
            removed += 1;
        }
    }

    log::trace!("bond resolution added {added} and removed {removed} bond(s)");
}

fn remove_all_bonds_linked_with(cell: &mut Cell, atom: AtomId) {
    for bond in cell.bonds_of(atom) {
        cell.remove_bond(&bond);
    }
}

/// Drops bonds with an endpoint that is no longer a member of the cell. With no atoms left
/// that is every bond.
fn remove_orphan_bonds(cell: &mut Cell) {
    let orphans: Vec<Bond> = cell
        .bonds()
        .iter()
        .filter(|bond| !cell.contains_atom(bond.atom1()) || !cell.contains_atom(bond.atom2()))
        .copied()
        .collect();
    for bond in orphans {
        cell.remove_bond(&bond);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell::Lattice;

    fn serial_config() -> ResolverConfig {
        ResolverConfig {
            num_threads: 1,
            ..ResolverConfig::default()
        }
    }

    #[test]
    fn density_guard() {
        let config = serial_config();
        let mut cell = Cell::new(Lattice::cubic(2.0));
        for i in 0..4 {
            cell.add_atom("H", DVec3::new(i as f64 * 0.5, 0.0, 0.0)).unwrap();
        }
        // 4 atoms in 8 units of volume
        assert!(is_able_to_resolve(&cell, &config));
        cell.add_atom("H", DVec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(!is_able_to_resolve(&cell, &config));
    }

    #[test]
    fn degenerate_volume_cannot_be_resolved() {
        let config = serial_config();
        let mut cell = Cell::new(Lattice::orthorhombic(1.0, 1.0, 0.0));
        cell.add_atom("H", DVec3::zero()).unwrap();
        assert!(!is_able_to_resolve(&cell, &config));

        cell.set_lattice(Lattice::orthorhombic(10.0, 10.0, -10.0));
        assert!(!is_able_to_resolve(&cell, &config));

        cell.set_lattice(Lattice::orthorhombic(10.0, 10.0, f64::NAN));
        assert!(!is_able_to_resolve(&cell, &config));
    }

    #[test]
    fn collects_additions_and_removals() {
        let config = serial_config();
        let a = Site {
            id: AtomId(1),
            position: DVec3::zero(),
            radius: 0.5,
        };
        let near = Site {
            id: AtomId(2),
            position: DVec3::new(0.7, 0.0, 0.0),
            radius: 0.5,
        };
        let far = Site {
            id: AtomId(3),
            position: DVec3::new(3.0, 0.0, 0.0),
            radius: 0.5,
        };
        let sites = [a, near, far];

        let mut changes = BondChanges::default();
        collect_changes(&a, &sites, None, &config, &mut changes);
        assert_eq!(changes.to_add, vec![Bond::new(AtomId(1), AtomId(2))]);
        assert!(changes.to_remove.is_empty());

        let existing: IndexSet<Bond> = [
            Bond::new(AtomId(1), AtomId(2)),
            Bond::new(AtomId(3), AtomId(1)),
        ]
        .into_iter()
        .collect();
        let mut changes = BondChanges::default();
        collect_changes(&a, &sites, Some(&existing), &config, &mut changes);
        assert!(changes.to_add.is_empty());
        assert_eq!(changes.to_remove, vec![Bond::new(AtomId(1), AtomId(3))]);
    }

    #[test]
    fn orphaned_bonds_are_dropped_by_a_full_rescan() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let resolver = BondsResolver::attach(&mut cell, serial_config()).unwrap();
        resolver.set_auto(false);

        let a = cell.add_atom_with_radius("X", DVec3::zero(), 0.5).unwrap();
        let b = cell
            .add_atom_with_radius("X", DVec3::new(0.7, 0.0, 0.0), 0.5)
            .unwrap();
        resolver.resolve_now(&mut cell);
        assert!(cell.has_bond(a, b));

        cell.remove_atom(b);
        assert_eq!(cell.num_bonds(), 1);

        resolver.resolve_now(&mut cell);
        assert_eq!(cell.num_bonds(), 0);
    }

    #[test]
    fn refuses_foreign_cells() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let mut other = Cell::new(Lattice::cubic(10.0));
        let resolver = BondsResolver::attach(&mut cell, serial_config()).unwrap();

        resolver.resolve(&mut other);
        assert_eq!(other.pending_tasks(), 0);
        assert!(!resolver.clone().detach(&mut other));
        assert!(resolver.detach(&mut cell));
    }
}

// End of File
