//! Cart-pole swing-up task with Runge-Kutta integrated physics
//!
//! The physical state is `[x, theta, xdot, thetadot]` with `theta = 0` meaning
//! the pole points straight up. Episodes start with the pole hanging down and
//! never terminate early; the training loop's step horizon ends them.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::discretize::{Dimension, encode, encoded_size};
use crate::{
    Error, Result,
    ports::Environment,
    types::{Action, Bounds, Reward, State},
};

/// Continuous cart-pole state `[x, theta, xdot, thetadot]`
pub type CartpoleState = [f64; 4];

const STATE_LEN: usize = 4;

/// Position beyond which the cart is considered out of the track
const X_FAILURE: f64 = 2.0;

/// Physical and discretisation parameters of the cart-pole task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartpoleSettings {
    /// Force applied for action 0 and action 1
    pub forces: [f64; 2],
    pub x: Dimension,
    pub theta: Dimension,
    pub xdot: Dimension,
    pub thetadot: Dimension,
    pub gravity: f64,
    pub cart_mass: f64,
    pub pole_mass: f64,
    /// Half length of the pole
    pub pole_length: f64,
    /// Control frequency; one step integrates `1 / fps` seconds
    pub fps: u32,
}

impl CartpoleSettings {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gravity", self.gravity),
            ("cart_mass", self.cart_mass),
            ("pole_mass", self.pole_mass),
            ("pole_length", self.pole_length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid_parameter(
                    name,
                    format!("{value} must be positive and finite"),
                ));
            }
        }
        if self.fps == 0 {
            return Err(Error::invalid_parameter("fps", "must be positive"));
        }
        if self.forces.iter().any(|force| !force.is_finite()) {
            return Err(Error::invalid_parameter("forces", "must be finite"));
        }
        for dimension in [&self.x, &self.theta, &self.xdot, &self.thetadot] {
            dimension.validate()?;
        }
        Ok(())
    }
}

impl Default for CartpoleSettings {
    fn default() -> Self {
        let dimension = |lo: f64, hi: f64, buckets: usize| Dimension {
            bounds: Bounds { lo, hi },
            buckets,
        };
        Self {
            forces: [-10.0, 10.0],
            x: dimension(-2.0, 2.0, 4),
            theta: dimension(-PI, PI, 40),
            xdot: dimension(-2.0, 2.0, 10),
            thetadot: dimension(-10.0, 10.0, 50),
            gravity: 9.80665,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_length: 0.5,
            fps: 50,
        }
    }
}

/// Cart-pole environment
#[derive(Debug, Clone)]
pub struct CartpoleEnvironment {
    forces: [f64; 2],
    dimensions: [Dimension; STATE_LEN],

    g: f64,
    m: f64,
    l: f64,
    ml: f64,
    mass: f64,
    tau: f64,

    init_state: CartpoleState,
    s: CartpoleState,
}

impl CartpoleEnvironment {
    /// Pole hanging straight down, cart at rest in the centre
    pub const HANGING: CartpoleState = [0.0, PI, 0.0, 0.0];

    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for non-positive physical constants
    /// or a zero frame rate.
    pub fn new(settings: CartpoleSettings) -> Result<Self> {
        settings.validate()?;
        let ml = settings.pole_mass * settings.pole_length;
        Ok(Self {
            forces: settings.forces,
            dimensions: [
                settings.x,
                settings.theta,
                settings.xdot,
                settings.thetadot,
            ],
            g: settings.gravity,
            m: settings.pole_mass,
            l: settings.pole_length,
            ml,
            mass: settings.cart_mass + settings.pole_mass,
            tau: 1.0 / settings.fps as f64,
            init_state: Self::HANGING,
            s: Self::HANGING,
        })
    }

    /// Start every episode from `state` instead of the hanging position
    pub fn with_initial_state(mut self, state: CartpoleState) -> Self {
        self.init_state = state;
        self.s = state;
        self
    }

    pub fn physical_state(&self) -> CartpoleState {
        self.s
    }

    /// Integrate one control period with an explicit force `u`
    pub fn integrate(&mut self, u: f64) {
        self.s = self.solve_runge_kutta(&self.s, u, self.tau);
    }

    /// Classical 4th-order Runge-Kutta over `dt`, then wrap theta
    fn solve_runge_kutta(&self, s: &CartpoleState, u: f64, dt: f64) -> CartpoleState {
        let k1 = self.differential(s, u);
        let k2 = self.differential(&euler(s, &k1, dt / 2.0), u);
        let k3 = self.differential(&euler(s, &k2, dt / 2.0), u);
        let k4 = self.differential(&euler(s, &k3, dt), u);

        let mut next = *s;
        for i in 0..STATE_LEN {
            next[i] += (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) * dt / 6.0;
        }
        next[1] = normalize_angle(next[1]);
        next
    }

    /// Time derivative of the state under force `u`
    fn differential(&self, s: &CartpoleState, u: f64) -> CartpoleState {
        let [_, theta, xdot, thetadot] = *s;

        let sintheta = theta.sin();
        let costheta = theta.cos();

        let (g, m, l, ml, mass) = (self.g, self.m, self.l, self.ml, self.mass);

        let xddot = (4.0 * u / 3.0 + 4.0 * ml * thetadot.powi(2) * sintheta / 3.0
            - m * g * (2.0 * theta).sin() / 2.0)
            / (4.0 * mass - m * costheta.powi(2));
        let thetaddot =
            (mass * g * sintheta - ml * thetadot.powi(2) * sintheta * costheta - u * costheta)
                / (4.0 * mass * l / 3.0 - ml * costheta.powi(2));

        [xdot, thetadot, xddot, thetaddot]
    }
}

fn euler(s: &CartpoleState, sdot: &CartpoleState, dt: f64) -> CartpoleState {
    let mut res = *s;
    for i in 0..STATE_LEN {
        res[i] += sdot[i] * dt;
    }
    res
}

/// Wrap an angle via `(theta + 3pi) mod 2pi - pi`
pub fn normalize_angle(theta: f64) -> f64 {
    (theta + 3.0 * PI) % (2.0 * PI) - PI
}

impl Environment for CartpoleEnvironment {
    fn state_size(&self) -> usize {
        encoded_size(&self.dimensions)
    }

    fn action_size(&self) -> usize {
        self.forces.len()
    }

    fn state(&self) -> State {
        encode(&self.dimensions, &self.s)
    }

    fn reward(&self) -> Reward {
        let [x, theta, ..] = self.s;
        if x.abs() > X_FAILURE {
            -2.0
        } else {
            -theta.abs() + PI / 2.0 - 0.01 * x.abs()
        }
    }

    fn info(&self) -> String {
        let [x, theta, xdot, thetadot] = self.s;
        format!("{x:.15},{theta:.15},{xdot:.15},{thetadot:.15}")
    }

    fn reset(&mut self) {
        self.s = self.init_state;
    }

    fn step(&mut self, action: Action) {
        let u = self.forces[action];
        self.integrate(u);
    }

    fn is_finish(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Cartpole"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> CartpoleEnvironment {
        CartpoleEnvironment::new(CartpoleSettings::default()).unwrap()
    }

    #[test]
    fn test_hand_built_dimension_with_too_few_buckets_is_rejected() {
        let mut settings = CartpoleSettings::default();
        settings.xdot = Dimension {
            bounds: Bounds { lo: -2.0, hi: 2.0 },
            buckets: 1,
        };
        assert!(matches!(
            CartpoleEnvironment::new(settings),
            Err(Error::InvalidParameter { .. })
        ));

        let mut settings = CartpoleSettings::default();
        settings.x.bounds = Bounds { lo: 2.0, hi: -2.0 };
        assert!(CartpoleEnvironment::new(settings).is_err());
    }

    #[test]
    fn test_upright_equilibrium_stays_exactly_upright() {
        let mut env = env().with_initial_state([0.3, 0.0, 0.0, 0.0]);
        for _ in 0..500 {
            env.integrate(0.0);
            assert_eq!(env.physical_state()[1], 0.0);
        }
        assert_eq!(env.physical_state(), [0.3, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_angle_stays_wrapped() {
        let mut env = env();
        env.reset();
        for step in 0..1000 {
            env.step(step % 2);
            let theta = env.physical_state()[1];
            assert!((-PI..=PI).contains(&theta), "theta {theta} escaped");
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!((normalize_angle(2.0 * PI + 0.5) - 0.5).abs() < 1e-12);
        assert!((normalize_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_reward_shape() {
        let upright = env().with_initial_state([0.0, 0.0, 0.0, 0.0]);
        assert_eq!(upright.reward(), PI / 2.0);

        let hanging = env();
        assert!((hanging.reward() - (-PI + PI / 2.0)).abs() < 1e-12);

        let off_centre = env().with_initial_state([1.0, 0.0, 0.0, 0.0]);
        assert!((off_centre.reward() - (PI / 2.0 - 0.01)).abs() < 1e-12);

        let out_of_track = env().with_initial_state([-2.5, 0.0, 0.0, 0.0]);
        assert_eq!(out_of_track.reward(), -2.0);
    }

    #[test]
    fn test_never_finishes() {
        let mut env = env();
        for _ in 0..100 {
            env.step(1);
            assert!(!env.is_finish());
        }
    }

    #[test]
    fn test_state_index_in_range_and_encoded() {
        let env = env();
        assert_eq!(env.state_size(), 4 * 40 * 10 * 50);
        assert_eq!(env.action_size(), 2);

        // hanging: x=0 -> 2 of 4, theta=pi -> 39 of 40, xdot=0 -> 5 of 10, thetadot=0 -> 25 of 50
        let expected = ((2 * 40 + 39) * 10 + 5) * 50 + 25;
        assert_eq!(env.state(), expected);
        assert!(env.state() < env.state_size());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut env = env();
        for _ in 0..10 {
            env.step(0);
        }
        assert_ne!(env.physical_state(), CartpoleEnvironment::HANGING);
        env.reset();
        assert_eq!(env.physical_state(), CartpoleEnvironment::HANGING);
    }

    #[test]
    fn test_pushes_move_cart_in_opposite_directions() {
        let mut left = env();
        let mut right = env();
        for _ in 0..5 {
            left.step(0);
            right.step(1);
        }
        assert!(left.physical_state()[0] < 0.0);
        assert!(right.physical_state()[0] > 0.0);
    }

    #[test]
    fn test_info_has_fifteen_decimals() {
        let info = env().info();
        let fields: Vec<&str> = info.split(',').collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[1], format!("{PI:.15}"));
        assert!(fields.iter().all(|f| f.split('.').nth(1).map(str::len) == Some(15)));
    }

    #[test]
    fn test_rejects_zero_fps() {
        let settings = CartpoleSettings {
            fps: 0,
            ..CartpoleSettings::default()
        };
        assert!(CartpoleEnvironment::new(settings).is_err());
    }
}
