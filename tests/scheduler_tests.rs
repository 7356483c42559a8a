//! Fleet scheduler: call matching, nudging, snapshots and narration

use std::cell::RefCell;
use std::rc::Rc;

use elevator_sim::simulation::{
    CarId, CarState, Direction, FleetScheduler, FleetState, NullSink, Request, SimError,
    TrafficGenerator, BOARDING_TIME,
};

fn quiet_fleet(floors: u32, cars: u32) -> FleetScheduler {
    FleetScheduler::with_sink(floors, cars, Box::new(NullSink)).expect("valid fleet")
}

fn floor_of(scheduler: &FleetScheduler, id: u32) -> u32 {
    scheduler.car(CarId(id)).expect("car exists").floor()
}

#[test]
fn test_construction_validation() {
    let no_floors = FleetScheduler::with_sink(0, 2, Box::new(NullSink)).err();
    assert_eq!(no_floors, Some(SimError::NoFloors));

    let no_cars = FleetScheduler::with_sink(10, 0, Box::new(NullSink)).err();
    assert_eq!(no_cars, Some(SimError::NoCars));
    assert!(no_cars.map_or(false, |e| e.is_range_error()));
}

#[test]
fn test_new_fleet_starts_idle_on_ground_floor() {
    let scheduler = quiet_fleet(10, 3);
    let ids: Vec<CarId> = scheduler.cars().iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![CarId(1), CarId(2), CarId(3)]);
    assert!(scheduler.cars().iter().all(|c| c.floor() == 1 && c.is_idle()));
    assert_eq!(scheduler.time(), 0);
    assert!(scheduler.requests().is_empty());
}

#[test]
fn test_request_call_validation() {
    let mut scheduler = quiet_fleet(10, 1);

    assert!(scheduler.request_call(0, Direction::Up).unwrap_err().is_range_error());
    assert!(scheduler.request_call(11, Direction::Down).unwrap_err().is_range_error());
    assert!(scheduler.requests().is_empty());
    assert_eq!(scheduler.stats().calls_placed, 0);

    scheduler.request_call(7, Direction::Down).unwrap();
    assert_eq!(scheduler.requests(), vec![Request::new(7, Direction::Down)]);
    // Nothing happens until the next tick
    assert_eq!(floor_of(&scheduler, 1), 1);
    assert!(scheduler.car(CarId(1)).unwrap().is_idle());
}

#[test]
fn test_assign_floor_errors() {
    let mut scheduler = quiet_fleet(10, 2);

    let err = scheduler.assign_floor(CarId(3), 5).unwrap_err();
    assert_eq!(err, SimError::CarNotFound(CarId(3)));
    assert!(err.is_not_found());

    let err = scheduler.assign_floor(CarId(2), 12).unwrap_err();
    assert!(err.is_range_error());
    assert!(scheduler.cars().iter().all(|c| c.is_idle()));

    scheduler.assign_floor(CarId(2), 6).unwrap();
    assert_eq!(scheduler.car(CarId(2)).unwrap().jobs(Direction::Up), vec![6]);
    assert!(scheduler.car(CarId(1)).unwrap().is_idle());
}

#[test]
fn test_ticking_without_input_changes_nothing() {
    let mut scheduler = quiet_fleet(10, 3);
    let before: Vec<_> = scheduler.cars().iter().map(|c| c.status()).collect();

    scheduler.tick(25);

    let after: Vec<_> = scheduler.cars().iter().map(|c| c.status()).collect();
    assert_eq!(before, after);
    assert_eq!(scheduler.time(), 25);
}

#[test]
fn test_hall_call_end_to_end() {
    let mut scheduler = quiet_fleet(10, 1);
    scheduler.request_call(3, Direction::Down).unwrap();

    // Not free yet, so the idle car is nudged toward the call
    scheduler.tick(1);
    assert_eq!(floor_of(&scheduler, 1), 2);
    assert_eq!(scheduler.requests().len(), 1);

    // The nudge reaches floor 3 and the call is served on the same tick
    scheduler.tick(1);
    assert_eq!(floor_of(&scheduler, 1), 3);
    assert!(scheduler.requests().is_empty());
    assert_eq!(
        scheduler.car(CarId(1)).unwrap().boarding_countdown(),
        BOARDING_TIME
    );
    assert_eq!(scheduler.stats().calls_served, 1);
    assert_eq!(scheduler.stats().total_wait, 2);

    // The passenger presses 7; the doors stay open for the boarding period
    scheduler.assign_floor(CarId(1), 7).unwrap();
    for _ in 0..BOARDING_TIME {
        scheduler.tick(1);
        assert_eq!(floor_of(&scheduler, 1), 3);
    }
    scheduler.tick(1);
    assert_eq!(floor_of(&scheduler, 1), 4);
}

#[test]
fn test_call_at_idle_car_floor_is_served_immediately() {
    let mut scheduler = quiet_fleet(10, 1);
    scheduler.request_call(1, Direction::Up).unwrap();

    scheduler.tick(1);

    assert!(scheduler.requests().is_empty());
    assert_eq!(floor_of(&scheduler, 1), 1);
    assert_eq!(
        scheduler.car(CarId(1)).unwrap().boarding_countdown(),
        BOARDING_TIME
    );
    assert_eq!(scheduler.stats().calls_served, 1);
    assert_eq!(scheduler.stats().max_wait, 1);
}

#[test]
fn test_tie_goes_to_first_car() {
    let mut scheduler = quiet_fleet(10, 2);
    assert_eq!(
        scheduler.best_car(5, Direction::Up),
        Some((CarId(1), 4))
    );

    scheduler.request_call(5, Direction::Up).unwrap();
    scheduler.tick(1);

    assert_eq!(floor_of(&scheduler, 1), 2);
    assert_eq!(floor_of(&scheduler, 2), 1);
}

#[test]
fn test_car_is_nudged_once_per_tick() {
    let mut scheduler = quiet_fleet(10, 1);
    scheduler.request_call(5, Direction::Up).unwrap();
    scheduler.request_call(7, Direction::Down).unwrap();

    scheduler.tick(1);

    assert_eq!(floor_of(&scheduler, 1), 2);
    assert_eq!(scheduler.requests().len(), 2);
}

#[test]
fn test_call_picked_up_on_the_way() {
    let mut scheduler = quiet_fleet(10, 1);
    scheduler.assign_floor(CarId(1), 3).unwrap();
    scheduler.request_call(2, Direction::Up).unwrap();

    // Matching sees the car after it moved to 2, heading up
    scheduler.tick(1);
    assert_eq!(floor_of(&scheduler, 1), 2);
    assert!(scheduler.requests().is_empty());

    let car = scheduler.car(CarId(1)).unwrap();
    assert_eq!(car.boarding_countdown(), BOARDING_TIME);
    assert_eq!(car.jobs(Direction::Up), vec![3]);

    scheduler.tick(BOARDING_TIME + 1);
    assert_eq!(floor_of(&scheduler, 1), 3);
}

#[test]
fn test_wrong_direction_call_waits_at_same_floor() {
    // Known directional mismatch: the car stands at 5 heading up, so a down
    // call at 5 is not served until the up sweep is finished.
    let mut scheduler = quiet_fleet(10, 1);
    scheduler.assign_floor(CarId(1), 5).unwrap();
    scheduler.assign_floor(CarId(1), 8).unwrap();
    scheduler.tick(4);
    assert_eq!(floor_of(&scheduler, 1), 5);

    scheduler.request_call(5, Direction::Down).unwrap();
    scheduler.tick(BOARDING_TIME);

    assert_eq!(floor_of(&scheduler, 1), 5);
    assert_eq!(scheduler.requests(), vec![Request::new(5, Direction::Down)]);
    assert_eq!(
        scheduler.best_car(5, Direction::Down),
        Some((CarId(1), 3 + BOARDING_TIME + 3))
    );
}

#[test]
fn test_served_calls_are_removed_and_order_kept() {
    let mut scheduler = quiet_fleet(10, 1);
    scheduler.request_call(1, Direction::Up).unwrap();
    scheduler.request_call(6, Direction::Up).unwrap();
    scheduler.request_call(1, Direction::Down).unwrap();
    scheduler.request_call(9, Direction::Down).unwrap();

    scheduler.tick(1);

    // The car is boarding, so it is not nudged toward the other calls
    assert_eq!(floor_of(&scheduler, 1), 1);
    assert_eq!(
        scheduler.requests(),
        vec![
            Request::new(6, Direction::Up),
            Request::new(9, Direction::Down)
        ]
    );
    assert_eq!(scheduler.stats().calls_served, 2);
}

#[test]
fn test_nearest_car_serves_call() {
    let state = FleetState {
        floor_count: 20,
        time: 0,
        requests: vec![],
        cars: vec![
            CarState { id: CarId(1), floor: 1 },
            CarState { id: CarId(2), floor: 15 },
        ],
    };
    let mut scheduler = FleetScheduler::from_state(&state, Box::new(NullSink)).unwrap();
    scheduler.request_call(12, Direction::Down).unwrap();

    scheduler.tick(3);

    assert_eq!(floor_of(&scheduler, 1), 1);
    assert_eq!(floor_of(&scheduler, 2), 12);
    assert!(scheduler.requests().is_empty());
}

#[test]
fn test_snapshot_drops_job_queues() {
    let mut scheduler = quiet_fleet(10, 2);
    scheduler.assign_floor(CarId(2), 9).unwrap();
    scheduler.request_call(4, Direction::Down).unwrap();
    scheduler.tick(3);

    let state = scheduler.current_state();
    assert_eq!(state.floor_count, 10);
    assert_eq!(state.time, 3);
    assert_eq!(state.cars.len(), 2);
    assert_eq!(state.cars[1], CarState { id: CarId(2), floor: 4 });

    let restored = FleetScheduler::from_state(&state, Box::new(NullSink)).unwrap();
    assert_eq!(restored.current_state(), state);
    assert_eq!(restored.time(), 3);

    let car = restored.car(CarId(2)).unwrap();
    assert!(car.is_idle());
    assert!(car.jobs(Direction::Up).is_empty());
    assert_eq!(car.boarding_countdown(), 0);
}

#[test]
fn test_from_state_validation() {
    let valid = FleetState {
        floor_count: 5,
        time: 10,
        requests: vec![Request::new(2, Direction::Up)],
        cars: vec![
            CarState { id: CarId(1), floor: 1 },
            CarState { id: CarId(4), floor: 5 },
        ],
    };
    assert!(FleetScheduler::from_state(&valid, Box::new(NullSink)).is_ok());

    let mut no_cars = valid.clone();
    no_cars.cars.clear();
    assert_eq!(
        FleetScheduler::from_state(&no_cars, Box::new(NullSink)).err(),
        Some(SimError::NoCars)
    );

    let mut duplicate = valid.clone();
    duplicate.cars[1].id = CarId(1);
    assert_eq!(
        FleetScheduler::from_state(&duplicate, Box::new(NullSink)).err(),
        Some(SimError::DuplicateCarId(CarId(1)))
    );

    let mut zero_id = valid.clone();
    zero_id.cars[0].id = CarId(0);
    assert_eq!(
        FleetScheduler::from_state(&zero_id, Box::new(NullSink)).err(),
        Some(SimError::InvalidCarId(CarId(0)))
    );

    let mut high_car = valid.clone();
    high_car.cars[1].floor = 6;
    assert!(FleetScheduler::from_state(&high_car, Box::new(NullSink))
        .err()
        .map_or(false, |e| e.is_range_error()));

    let mut bad_request = valid.clone();
    bad_request.requests.push(Request::new(0, Direction::Down));
    assert!(FleetScheduler::from_state(&bad_request, Box::new(NullSink)).is_err());
}

#[test]
fn test_restored_calls_wait_from_snapshot_time() {
    let state = FleetState {
        floor_count: 5,
        time: 10,
        requests: vec![Request::new(1, Direction::Up)],
        cars: vec![CarState { id: CarId(1), floor: 1 }],
    };
    let mut scheduler = FleetScheduler::from_state(&state, Box::new(NullSink)).unwrap();
    assert_eq!(scheduler.stats().calls_placed, 1);

    scheduler.request_call(1, Direction::Down).unwrap();
    scheduler.tick(1);

    let stats = scheduler.stats();
    assert_eq!(stats.calls_placed, 2);
    assert_eq!(stats.calls_served, 2);
    assert_eq!(stats.total_wait, 2);
    assert!(stats.service_rate() <= 100.0);
}

#[test]
fn test_restore_keeps_sink_and_replaces_state() {
    let lines = Rc::new(RefCell::new(Vec::<String>::new()));
    let captured = Rc::clone(&lines);
    let mut scheduler = FleetScheduler::with_sink(
        10,
        1,
        Box::new(move |line: &str| captured.borrow_mut().push(line.to_string())),
    )
    .unwrap();
    scheduler.assign_floor(CarId(1), 6).unwrap();

    let state = FleetState {
        floor_count: 8,
        time: 4,
        requests: vec![Request::new(5, Direction::Down)],
        cars: vec![
            CarState { id: CarId(1), floor: 3 },
            CarState { id: CarId(2), floor: 8 },
        ],
    };
    scheduler.restore(&state).unwrap();
    assert_eq!(scheduler.current_state(), state);
    assert!(scheduler.car(CarId(1)).unwrap().is_idle());
    assert_eq!(scheduler.stats().calls_placed, 1);

    lines.borrow_mut().clear();
    scheduler.tick(1);
    assert!(lines.borrow().iter().any(|l| l.starts_with("t=5 |")));

    let mut bad = state.clone();
    bad.floor_count = 0;
    assert_eq!(scheduler.restore(&bad).err(), Some(SimError::NoFloors));
    assert_eq!(scheduler.floor_count(), 8);
    assert_eq!(scheduler.time(), 5);
}

#[test]
fn test_status_display() {
    let mut scheduler = quiet_fleet(5, 2);
    assert_eq!(scheduler.status().to_string(), "t=0 | cars: 1:1· 2:1· | calls: none");

    scheduler.assign_floor(CarId(2), 4).unwrap();
    scheduler.request_call(3, Direction::Down).unwrap();
    assert_eq!(
        scheduler.status().to_string(),
        "t=0 | cars: 1:1· 2:1↑ | calls: 3:↓"
    );
}

#[test]
fn test_events_reach_injected_sink() {
    let lines = Rc::new(RefCell::new(Vec::<String>::new()));
    let captured = Rc::clone(&lines);
    let mut scheduler = FleetScheduler::with_sink(
        10,
        1,
        Box::new(move |line: &str| captured.borrow_mut().push(line.to_string())),
    )
    .unwrap();

    scheduler.request_call(3, Direction::Down).unwrap();
    scheduler.tick(2);

    let lines = lines.borrow();
    assert!(lines.iter().any(|l| l == "call registered at 3:↓"));
    assert!(lines.iter().any(|l| l.contains("nudged to floor 2")));
    assert!(lines.iter().any(|l| l.contains("holding at floor 3")));
    assert!(lines.iter().any(|l| l.starts_with("t=2 |")));
}

#[test]
fn test_generated_traffic_keeps_invariants() {
    let mut scheduler = quiet_fleet(12, 3);
    let mut traffic = TrafficGenerator::new_with_seed(7, 0.4, 0.2);

    for _ in 0..500 {
        traffic.apply(&mut scheduler).unwrap();
        scheduler.tick(1);

        for car in scheduler.cars() {
            assert!((1..=12).contains(&car.floor()));
            let up = car.jobs(Direction::Up);
            let down = car.jobs(Direction::Down);
            assert!(up.windows(2).all(|w| w[0] <= w[1]));
            assert!(down.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    assert_eq!(scheduler.time(), 500);
    assert!(scheduler.stats().calls_placed > 0);
    assert!(scheduler.stats().calls_served > 0);
}
