// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use crate::{
    Atom, AtomEvent, Bond, CellError, CellEvent, CellListener, EventSource, Lattice,
    ListenerContext,
};
use common::{AtomId, CellId, ListenerId};
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use std::collections::VecDeque;
use ultraviolet::DVec3;

type Task = Box<dyn FnOnce(&mut Cell)>;

struct Registration {
    id: ListenerId,
    // Empty while the listener is being called.
    listener: Option<Box<dyn CellListener>>,
}

enum Notification {
    Cell(CellEvent),
    Atom {
        atom: AtomId,
        subscribers: SmallVec<[ListenerId; 2]>,
        event: AtomEvent,
    },
}

/// A crystal cell: lattice vectors, an ordered set of atoms and the bonds between them.
///
/// Every mutation goes through a command method that validates it, applies it and then notifies
/// the registered listeners. The cell also hosts the owner's deferred-work queue, see
/// [`Cell::run_later`].
pub struct Cell {
    id: CellId,
    lattice: Lattice,
    atoms: IndexMap<AtomId, Atom>,
    bonds: IndexSet<Bond>,
    next_atom_id: AtomId,
    listeners: Vec<Registration>,
    next_listener_id: u32,
    notifications: VecDeque<Notification>,
    dispatching: bool,
    tasks: VecDeque<Task>,
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("id", &self.id)
            .field("lattice", &self.lattice)
            .field("atoms", &self.atoms.len())
            .field("bonds", &self.bonds.len())
            .field("listeners", &self.listeners.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl Cell {
    pub fn new(lattice: Lattice) -> Self {
        Self {
            id: CellId::fresh(),
            lattice,
            atoms: IndexMap::new(),
            bonds: IndexSet::new(),
            next_atom_id: AtomId::FIRST,
            listeners: Vec::new(),
            next_listener_id: 0,
            notifications: VecDeque::new(),
            dispatching: false,
            tasks: VecDeque::new(),
        }
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn volume(&self) -> f64 {
        self.lattice.volume()
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn num_bonds(&self) -> usize {
        self.bonds.len()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    pub fn contains_atom(&self, id: AtomId) -> bool {
        self.atoms.contains_key(&id)
    }

    /// Atoms in insertion order.
    pub fn atoms(&self) -> impl ExactSizeIterator<Item = &Atom> + '_ {
        self.atoms.values()
    }

    pub fn atom_ids(&self) -> impl ExactSizeIterator<Item = AtomId> + '_ {
        self.atoms.keys().copied()
    }

    pub fn bonds(&self) -> &IndexSet<Bond> {
        &self.bonds
    }

    pub fn has_bond(&self, atom1: AtomId, atom2: AtomId) -> bool {
        self.bonds.contains(&Bond::new(atom1, atom2))
    }

    /// Every bond with `atom` as an endpoint. Works for atoms that have already been removed,
    /// which is what lets listeners clean up after an [`CellEvent::AtomRemoved`].
    pub fn bonds_of(&self, atom: AtomId) -> Vec<Bond> {
        self.bonds.iter().filter(|bond| bond.links(atom)).copied().collect()
    }

    // Commands

    /// Adds an atom whose covalent radius is looked up from the element its name starts with.
    pub fn add_atom(&mut self, name: &str, position: DVec3) -> Result<AtomId, CellError> {
        self.insert_atom(name, position, None)
    }

    /// Adds an atom with an explicit covalent radius. Later renames keep that radius.
    pub fn add_atom_with_radius(
        &mut self,
        name: &str,
        position: DVec3,
        radius: f64,
    ) -> Result<AtomId, CellError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(CellError::InvalidRadius(radius));
        }
        self.insert_atom(name, position, Some(radius))
    }

    fn insert_atom(
        &mut self,
        name: &str,
        position: DVec3,
        radius: Option<f64>,
    ) -> Result<AtomId, CellError> {
        if !is_finite(position) {
            return Err(CellError::InvalidPosition);
        }
        let id = self.next_atom_id;
        self.next_atom_id = id.next();
        self.atoms.insert(id, Atom::new(id, name, position, radius));
        self.notify(Notification::Cell(CellEvent::AtomAdded(id)));
        Ok(id)
    }

    /// Removes an atom. Its bonds are left in place: cleaning them up is up to the listeners
    /// reacting to [`CellEvent::AtomRemoved`].
    pub fn remove_atom(&mut self, id: AtomId) -> Option<Atom> {
        let atom = self.atoms.shift_remove(&id)?;
        self.notify(Notification::Cell(CellEvent::AtomRemoved(id)));
        Some(atom)
    }

    pub fn move_atom(&mut self, id: AtomId, position: DVec3) -> Result<(), CellError> {
        if !is_finite(position) {
            return Err(CellError::InvalidPosition);
        }
        let atom = self.atoms.get_mut(&id).ok_or(CellError::UnknownAtom(id))?;
        let previous = atom.set_position(position);
        let subscribers = atom.subscribers.clone();
        self.notify(Notification::Atom {
            atom: id,
            subscribers,
            event: AtomEvent::Moved {
                delta: position - previous,
            },
        });
        Ok(())
    }

    pub fn translate_atom(&mut self, id: AtomId, delta: DVec3) -> Result<(), CellError> {
        let position = self.atom(id).ok_or(CellError::UnknownAtom(id))?.position();
        self.move_atom(id, position + delta)
    }

    pub fn rename_atom(&mut self, id: AtomId, name: &str) -> Result<(), CellError> {
        let atom = self.atoms.get_mut(&id).ok_or(CellError::UnknownAtom(id))?;
        let old_name = atom.rename(name);
        let subscribers = atom.subscribers.clone();
        self.notify(Notification::Atom {
            atom: id,
            subscribers,
            event: AtomEvent::Renamed {
                old_name,
                name: name.to_owned(),
            },
        });
        Ok(())
    }

    pub fn set_lattice(&mut self, lattice: Lattice) {
        self.lattice = lattice;
        self.notify(Notification::Cell(CellEvent::LatticeMoved));
    }

    /// Inserts a bond between two member atoms. Returns `false` without notifying anyone when
    /// the bond already exists, joins an atom to itself, or names an atom outside the cell.
    pub fn add_bond(&mut self, atom1: AtomId, atom2: AtomId) -> bool {
        if atom1 == atom2 || !self.contains_atom(atom1) || !self.contains_atom(atom2) {
            log::debug!("refusing bond {atom1} - {atom2}");
            return false;
        }
        let bond = Bond::new(atom1, atom2);
        if !self.bonds.insert(bond) {
            return false;
        }
        if let Some(atom) = self.atoms.get_mut(&atom1) {
            atom.neighbors.push(atom2);
        }
        if let Some(atom) = self.atoms.get_mut(&atom2) {
            atom.neighbors.push(atom1);
        }
        self.notify(Notification::Cell(CellEvent::BondAdded(bond)));
        true
    }

    /// Removes a bond. Returns `false` when the cell holds no such bond.
    pub fn remove_bond(&mut self, bond: &Bond) -> bool {
        let Some(bond) = self.bonds.swap_take(bond) else {
            return false;
        };
        for (end, other) in [(bond.atom1(), bond.atom2()), (bond.atom2(), bond.atom1())] {
            if let Some(atom) = self.atoms.get_mut(&end) {
                atom.neighbors.retain(|neighbor| *neighbor != other);
            }
        }
        self.notify(Notification::Cell(CellEvent::BondRemoved(bond)));
        true
    }

    // Listener registration

    /// Registers a listener behind every listener already present.
    pub fn add_listener(&mut self, listener: Box<dyn CellListener>) -> ListenerId {
        let id = self.issue_listener_id();
        self.listeners.push(Registration {
            id,
            listener: Some(listener),
        });
        id
    }

    /// Registers a listener ahead of every listener already present, so it sees each
    /// notification before anyone else does.
    pub fn add_listener_first(&mut self, listener: Box<dyn CellListener>) -> ListenerId {
        let id = self.issue_listener_id();
        self.listeners.insert(
            0,
            Registration {
                id,
                listener: Some(listener),
            },
        );
        id
    }

    /// Unregisters a listener and drops its atom subscriptions. A listener may remove itself
    /// while it is being notified.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some(index) = self.listeners.iter().position(|r| r.id == id) else {
            return false;
        };
        self.listeners.remove(index);
        for atom in self.atoms.values_mut() {
            atom.subscribers.retain(|subscriber| *subscriber != id);
        }
        true
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|r| r.id == id)
    }

    /// Subscribes a registered listener to an atom's events, behind earlier subscribers.
    pub fn subscribe_atom(&mut self, atom: AtomId, listener: ListenerId) -> Result<(), CellError> {
        self.subscribe(atom, listener, false)
    }

    /// Subscribes a registered listener to an atom's events, ahead of earlier subscribers.
    pub fn subscribe_atom_first(
        &mut self,
        atom: AtomId,
        listener: ListenerId,
    ) -> Result<(), CellError> {
        self.subscribe(atom, listener, true)
    }

    fn subscribe(
        &mut self,
        atom: AtomId,
        listener: ListenerId,
        first: bool,
    ) -> Result<(), CellError> {
        let atom = self.atoms.get_mut(&atom).ok_or(CellError::UnknownAtom(atom))?;
        atom.subscribers.retain(|subscriber| *subscriber != listener);
        if first {
            atom.subscribers.insert(0, listener);
        } else {
            atom.subscribers.push(listener);
        }
        Ok(())
    }

    fn issue_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        id
    }

    // Deferred work

    /// Queues `task` to run the next time the owner drains the queue with [`Cell::run_pending`].
    pub fn run_later<F>(&mut self, task: F)
    where
        F: FnOnce(&mut Cell) + 'static,
    {
        self.tasks.push_back(Box::new(task));
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Runs queued tasks in the order they were queued, including tasks queued along the way,
    /// until the queue is empty. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop_front() {
            task(self);
            ran += 1;
        }
        ran
    }

    // Notification delivery

    fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        if self.dispatching {
            return;
        }

        self.dispatching = true;
        while let Some(notification) = self.notifications.pop_front() {
            match notification {
                Notification::Cell(event) => {
                    let recipients: SmallVec<[ListenerId; 4]> =
                        self.listeners.iter().map(|r| r.id).collect();
                    let source = EventSource::Cell(self.id);
                    for id in recipients {
                        self.deliver(id, source, |listener, cell, ctx| {
                            listener.on_cell_event(cell, ctx, &event)
                        });
                    }
                }
                Notification::Atom {
                    atom,
                    subscribers,
                    event,
                } => {
                    let source = EventSource::Atom(atom);
                    for id in subscribers {
                        self.deliver(id, source, |listener, cell, ctx| {
                            listener.on_atom_event(cell, ctx, &event)
                        });
                    }
                }
            }
        }
        self.dispatching = false;
    }

    fn deliver<F>(&mut self, id: ListenerId, source: EventSource, call: F)
    where
        F: FnOnce(&mut dyn CellListener, &mut Cell, &ListenerContext),
    {
        let Some(mut listener) = self
            .listeners
            .iter_mut()
            .find(|r| r.id == id)
            .and_then(|r| r.listener.take())
        else {
            return;
        };

        let ctx = ListenerContext {
            listener: id,
            source,
        };
        call(listener.as_mut(), self, &ctx);

        // The listener may have unregistered itself meanwhile, in which case it is dropped here.
        if let Some(registration) = self.listeners.iter_mut().find(|r| r.id == id) {
            registration.listener = Some(listener);
        }
    }
}

fn is_finite(v: DVec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        tag: &'static str,
        log: Log,
    }

    impl CellListener for Recorder {
        fn on_cell_event(&mut self, _cell: &mut Cell, _ctx: &ListenerContext, event: &CellEvent) {
            self.log.borrow_mut().push(format!("{} {:?}", self.tag, event));
        }

        fn on_atom_event(&mut self, _cell: &mut Cell, ctx: &ListenerContext, event: &AtomEvent) {
            let kind = match event {
                AtomEvent::Renamed { .. } => "renamed",
                AtomEvent::Moved { .. } => "moved",
            };
            self.log
                .borrow_mut()
                .push(format!("{} {:?} {}", self.tag, ctx.source, kind));
        }
    }

    fn recorder(tag: &'static str, log: &Log) -> Box<dyn CellListener> {
        Box::new(Recorder {
            tag,
            log: log.clone(),
        })
    }

    #[test]
    fn atoms_keep_insertion_order_and_ids_are_not_reused() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let a = cell.add_atom("C", DVec3::zero()).unwrap();
        let b = cell.add_atom("O", DVec3::unit_x()).unwrap();
        let c = cell.add_atom("N", DVec3::unit_y()).unwrap();
        assert_eq!(cell.atom_ids().collect::<Vec<_>>(), vec![a, b, c]);

        cell.remove_atom(b);
        let d = cell.add_atom("H", DVec3::unit_z()).unwrap();
        assert_ne!(d, b);
        assert_eq!(cell.atom_ids().collect::<Vec<_>>(), vec![a, c, d]);
    }

    #[test]
    fn rejects_bad_atoms() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        assert_eq!(
            cell.add_atom("C", DVec3::new(f64::NAN, 0.0, 0.0)),
            Err(CellError::InvalidPosition)
        );
        assert_eq!(
            cell.add_atom_with_radius("C", DVec3::zero(), 0.0),
            Err(CellError::InvalidRadius(0.0))
        );
        assert_eq!(
            cell.move_atom(AtomId(99), DVec3::zero()),
            Err(CellError::UnknownAtom(AtomId(99)))
        );
        assert_eq!(cell.num_atoms(), 0);
    }

    #[test]
    fn bonds_are_idempotent_and_tracked_on_both_atoms() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let a = cell.add_atom("C", DVec3::zero()).unwrap();
        let b = cell.add_atom("C", DVec3::unit_x()).unwrap();

        assert!(cell.add_bond(a, b));
        assert!(!cell.add_bond(b, a));
        assert!(!cell.add_bond(a, a));
        assert!(!cell.add_bond(a, AtomId(42)));
        assert_eq!(cell.num_bonds(), 1);
        assert_eq!(cell.atom(a).unwrap().neighbors(), &[b]);
        assert_eq!(cell.atom(b).unwrap().neighbors(), &[a]);
        assert!(cell.has_bond(b, a));

        assert!(cell.remove_bond(&Bond::new(b, a)));
        assert!(!cell.remove_bond(&Bond::new(a, b)));
        assert_eq!(cell.num_bonds(), 0);
        assert!(cell.atom(a).unwrap().neighbors().is_empty());
    }

    #[test]
    fn removing_an_atom_leaves_its_bonds_to_listeners() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let a = cell.add_atom("C", DVec3::zero()).unwrap();
        let b = cell.add_atom("C", DVec3::unit_x()).unwrap();
        cell.add_bond(a, b);

        cell.remove_atom(a);
        assert_eq!(cell.bonds_of(a), vec![Bond::new(a, b)]);
        assert!(cell.remove_bond(&Bond::new(a, b)));
        assert!(cell.atom(b).unwrap().neighbors().is_empty());
    }

    #[test]
    fn first_listener_is_notified_first() {
        let log = Log::default();
        let mut cell = Cell::new(Lattice::cubic(10.0));
        cell.add_listener(recorder("late", &log));
        cell.add_listener_first(recorder("early", &log));

        cell.set_lattice(Lattice::cubic(5.0));
        assert_eq!(
            *log.borrow(),
            vec!["early LatticeMoved".to_string(), "late LatticeMoved".to_string()]
        );
    }

    #[test]
    fn atom_events_reach_only_subscribers() {
        let log = Log::default();
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let watcher = cell.add_listener(recorder("watcher", &log));
        cell.add_listener(recorder("other", &log));
        let a = cell.add_atom("C", DVec3::zero()).unwrap();
        let b = cell.add_atom("C", DVec3::unit_x()).unwrap();
        cell.subscribe_atom(a, watcher).unwrap();
        log.borrow_mut().clear();

        cell.translate_atom(a, DVec3::unit_y()).unwrap();
        cell.rename_atom(b, "Si").unwrap();
        assert_eq!(
            *log.borrow(),
            vec![format!("watcher {:?} moved", EventSource::Atom(a))]
        );
        assert_eq!(cell.atom(a).unwrap().position(), DVec3::new(0.0, 1.0, 0.0));
    }

    struct Bonder;

    impl CellListener for Bonder {
        fn on_cell_event(&mut self, cell: &mut Cell, _ctx: &ListenerContext, event: &CellEvent) {
            if let CellEvent::AtomAdded(atom) = event {
                let others: Vec<AtomId> = cell.atom_ids().filter(|id| id != atom).collect();
                for other in others {
                    cell.add_bond(*atom, other);
                }
            }
        }
    }

    #[test]
    fn commands_from_listeners_are_delivered_afterwards() {
        let log = Log::default();
        let mut cell = Cell::new(Lattice::cubic(10.0));
        cell.add_listener(Box::new(Bonder));
        cell.add_listener(recorder("rec", &log));

        let a = cell.add_atom("C", DVec3::zero()).unwrap();
        let b = cell.add_atom("C", DVec3::unit_x()).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                format!("rec {:?}", CellEvent::AtomAdded(a)),
                format!("rec {:?}", CellEvent::AtomAdded(b)),
                format!("rec {:?}", CellEvent::BondAdded(Bond::new(b, a))),
            ]
        );
    }

    struct OneShot;

    impl CellListener for OneShot {
        fn on_cell_event(&mut self, cell: &mut Cell, ctx: &ListenerContext, _event: &CellEvent) {
            cell.remove_listener(ctx.listener);
        }
    }

    #[test]
    fn listeners_may_unregister_themselves() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let id = cell.add_listener(Box::new(OneShot));
        cell.set_lattice(Lattice::cubic(4.0));
        assert!(!cell.has_listener(id));
        cell.set_lattice(Lattice::cubic(3.0));
    }

    #[test]
    fn tasks_run_in_queue_order_when_drained() {
        let mut cell = Cell::new(Lattice::cubic(10.0));
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = order.clone();
        cell.run_later(move |cell| {
            first.borrow_mut().push(1);
            let nested = first.clone();
            cell.run_later(move |_| nested.borrow_mut().push(3));
        });
        let second = order.clone();
        cell.run_later(move |_| second.borrow_mut().push(2));

        assert!(order.borrow().is_empty());
        assert_eq!(cell.pending_tasks(), 2);
        assert_eq!(cell.run_pending(), 3);
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
        assert_eq!(cell.pending_tasks(), 0);
    }
}

// End of File
