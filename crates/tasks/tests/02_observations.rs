use physics::SimState;
use tasks::ball_balance::observations::{
    ACTUATED_POS, ACTUATED_VEL, BALL_LIN_VEL, BALL_POS, SENSOR0_FORCE, SENSOR_TORQUES,
};
use tasks::ball_balance::{compute_observations, Leg, BALL_SLOT, BOT_SLOT, NUM_OBSERVATIONS};

/// Marker for env `e`, field `f`, component `c`: unique across the snapshot.
fn marker(env: usize, field: usize, component: usize) -> f32 {
    (env * 1000 + field * 10 + component) as f32
}

fn marked_state(num_envs: usize) -> SimState {
    let mut state = SimState::new(num_envs, 2, 6, 3);
    for env in 0..num_envs {
        for dof in 0..6 {
            let d = state.dof_mut(env, dof);
            d.pos = marker(env, 1, dof);
            d.vel = marker(env, 2, dof);
        }
        for slot in [BOT_SLOT, BALL_SLOT] {
            let root = state.root_mut(env, slot);
            for c in 0..3 {
                root.pos[c] = marker(env, 3 + 2 * slot, c);
                root.lin_vel[c] = marker(env, 4 + 2 * slot, c);
                root.ang_vel[c] = -1.0;
            }
        }
        for sensor in 0..3 {
            let reading = state.sensor_mut(env, sensor);
            for c in 0..3 {
                reading.force[c] = marker(env, 10 + sensor, c);
                reading.torque[c] = marker(env, 20 + sensor, c);
            }
        }
    }
    state
}

#[test]
fn every_marker_lands_at_its_documented_index() {
    let state = marked_state(3);
    let mut obs = vec![f32::NAN; 3 * NUM_OBSERVATIONS];
    compute_observations(&state, &mut obs);

    for env in 0..3 {
        let row = &obs[env * NUM_OBSERVATIONS..(env + 1) * NUM_OBSERVATIONS];
        for (k, leg) in Leg::ALL.iter().enumerate() {
            assert_eq!(row[ACTUATED_POS][k], marker(env, 1, leg.actuated_dof()));
            assert_eq!(row[ACTUATED_VEL][k], marker(env, 2, leg.actuated_dof()));
        }
        for c in 0..3 {
            assert_eq!(row[BALL_POS][c], marker(env, 5, c));
            assert_eq!(row[BALL_LIN_VEL][c], marker(env, 6, c));
            assert_eq!(row[SENSOR0_FORCE][c], marker(env, 10, c));
            for (sensor, range) in SENSOR_TORQUES.iter().enumerate() {
                assert_eq!(row[range.clone()][c], marker(env, 20 + sensor, c));
            }
        }
    }
}

#[test]
fn layout_covers_all_24_slots_once() {
    let mut covered = [0u8; NUM_OBSERVATIONS];
    let ranges = [ACTUATED_POS, ACTUATED_VEL, BALL_POS, BALL_LIN_VEL, SENSOR0_FORCE]
        .into_iter()
        .chain(SENSOR_TORQUES);
    for range in ranges {
        for i in range {
            covered[i] += 1;
        }
    }
    assert!(covered.iter().all(|&c| c == 1));
}

#[test]
fn actuated_joints_are_the_odd_dofs() {
    let state = marked_state(1);
    let mut obs = vec![0.0; NUM_OBSERVATIONS];
    compute_observations(&state, &mut obs);
    assert_eq!(&obs[0..3], &[marker(0, 1, 1), marker(0, 1, 3), marker(0, 1, 5)]);
}
