use crate::config::{ConfigKind, ConfigTree};
use rmcp::model::{GetPromptResult, PromptMessage, PromptMessageRole};

/// Name the prompt is registered under.
pub const PROMPT_NAME: &str = "nix_config_manager";

/// Short description shown in `prompts/list`.
pub const PROMPT_DESCRIPTION: &str = "Nix Config Manager";

/// Example nix-darwin flake embedded in the prompt to show the expected layout.
pub const SAMPLE_CONFIG: &str = r#"{
  description = "Example nix-darwin system flake";

  inputs = {
    nixpkgs.url = "github:NixOS/nixpkgs/nixos-24.11";
    nix-darwin.url = "github:LnL7/nix-darwin";
    nix-darwin.inputs.nixpkgs.follows = "nixpkgs";
    home-manager.url = "github:nix-community/home-manager/release-24.11";
    home-manager.inputs.nixpkgs.follows = "nixpkgs";
  };

  outputs = inputs@{ self, nix-darwin, home-manager, nixpkgs }:
  let
    username = "some-username";
    useremail = "someone@example.com";
    system = "aarch64-darwin";
    hostname = "some-hostname";

    specialArgs = inputs // {
      inherit username useremail hostname;
    };

    configuration = { pkgs, ... }: {
      environment.systemPackages = with pkgs; [
        elixir
        erlang
      ];

      nix.settings.experimental-features = "nix-command flakes";
      system.configurationRevision = self.rev or self.dirtyRev or null;
      system.stateVersion = 5;
      nixpkgs.hostPlatform = system;
    };
  in
  {
    # $ darwin-rebuild build --flake .#${hostname}
    darwinConfigurations."${hostname}" = nix-darwin.lib.darwinSystem {
      inherit system specialArgs;
      modules = [
        configuration
        home-manager.darwinModules.home-manager
        {
          home-manager.useGlobalPkgs = true;
          home-manager.useUserPackages = true;
          home-manager.extraSpecialArgs = specialArgs;
          home-manager.users.${username} = import ./home;
        }
      ];
    };

    formatter.${system} = nixpkgs.legacyPackages.${system}.alejandra;
  };
}"#;

/// Reply layout the agent must use when presenting a plan.
const PLAN_FORMAT: &str = "<BEGIN FORMAT>
## Introduction

I will be assisting with configuring Nix.

### Plan+Apply Loop

I run in a plan+apply loop whenever you request changes to the Nix config, so you
can review what I am about to change, ask questions, or make tweaks first.

Tell me to apply immediately (without confirming the plan) whenever you prefer that.

## Commands

You can instruct me with these commands at any point:
- update: update the Nix config
- read: read the Nix config

## Plan

I plan to take the following actions:
1. Update

<UPDATED NIX CONFIG (show the updated config together with its file name)>

Respond `apply` to apply this plan. Otherwise, give feedback and I will present an updated plan.
<END FORMAT>";

/// Render the instruction text around a live snapshot of the configuration.
pub fn render_manager_prompt(tree: &ConfigTree, kind: ConfigKind) -> String {
    let snapshot = serde_json::to_string_pretty(tree).unwrap_or_else(|_| "{}".to_string());
    let example = serde_json::to_string_pretty(&serde_json::json!({
        "/Users/username/.config/nix-darwin": {
            "flake.nix": SAMPLE_CONFIG,
        }
    }))
    .unwrap_or_default();

    format!(
        "You are a Nix Config Manager.\n\
        You will be given instructions in plain language. Work with the user through a \
        plan+apply loop, the way terraform does.\n\n\
        Do not retry the same failed action more than once. After 3 errors in a row, stop \
        and ask a clarifying question that helps form better inputs or address the error.\n\n\
        The configuration is provided as a JSON object mapping each directory to the files \
        it contains:\n\
        {{\n  \"path\": {{\n    \"filename\": \"content\"\n  }}\n}}\n\n\
        Example:\n{example}\n\n\
        The example shows nix-darwin configured with flakes. The configuration you manage may \
        also be a home-manager configuration (with or without flakes) or a nix-darwin \
        configuration without flakes. This one was found in a {kind} directory.\n\n\
        Below is the current configuration the user would like you to manage:\n\n\
        <BEGIN NIX CONFIG>\n{snapshot}\n<END NIX CONFIG>\n\n\
        Go through all of the configuration files and work out the imports and how the \
        configuration is structured.\n\n\
        The user will request changes in plain language. Respond with a plan in EXACTLY this \
        format:\n\n\
        {PLAN_FORMAT}\n\n\
        YOU MUST NOT PERFORM ANY ACTIONS UNTIL THE USER ASKS FOR IT BY SAYING \"apply\".\n\n\
        YOU MUST NOT EXECUTE ANY COMMANDS OR CALL ANY TOOLS UNTIL THE USER ASKS FOR IT.\n\n\
        YOU MUST READ THE CONFIG BEFORE MAKING CHANGES, AND ONLY MAKE THE CHANGES THE USER \
        REQUESTED UNLESS OTHERS ARE REQUIRED.\n\n\
        DO NOT CHANGE NIX, NIX-DARWIN OR HOME-MANAGER CHANNELS UNLESS THE USER EXPLICITLY \
        ASKS FOR IT.\n\n\
        If you produce a plan and the next user message is not `apply`, drop the plan and tell \
        the user they must explicitly include \"apply\" in the message. Only apply a plan \
        contained in your latest message; otherwise ask the user what the new plan should be.\n\n\
        IMPORTANT: keep responses brief unless instructed to be verbose."
    )
}

/// Build the full `prompts/get` result for the config manager prompt.
pub fn manager_prompt(tree: &ConfigTree, kind: ConfigKind) -> GetPromptResult {
    GetPromptResult {
        description: Some(PROMPT_DESCRIPTION.to_string()),
        messages: vec![PromptMessage::new_text(
            PromptMessageRole::User,
            render_manager_prompt(tree, kind),
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFiles;

    fn sample_tree() -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.insert(
            "/home/me/.config/home-manager".to_string(),
            ConfigFiles::from([("home.nix".to_string(), "{ programs.git.enable = true; }".to_string())]),
        );
        tree
    }

    #[test]
    fn test_prompt_embeds_live_tree() {
        let text = render_manager_prompt(&sample_tree(), ConfigKind::HomeManager);

        let begin = text.find("<BEGIN NIX CONFIG>").unwrap();
        let end = text.find("<END NIX CONFIG>").unwrap();
        let snapshot = &text[begin + "<BEGIN NIX CONFIG>".len()..end];
        let parsed: ConfigTree = serde_json::from_str(snapshot.trim()).unwrap();
        assert_eq!(parsed, sample_tree());
        assert!(text.contains("home-manager directory"));
    }

    #[test]
    fn test_prompt_states_apply_policy() {
        let text = render_manager_prompt(&ConfigTree::new(), ConfigKind::NixDarwin);

        assert!(text.starts_with("You are a Nix Config Manager."));
        assert!(text.contains("SAYING \"apply\""));
        assert!(text.contains("<BEGIN FORMAT>"));
        assert!(text.contains("<END FORMAT>"));
        assert!(text.contains("Example nix-darwin system flake"));
    }

    #[test]
    fn test_manager_prompt_result() {
        let result = manager_prompt(&sample_tree(), ConfigKind::NixDarwin);

        assert_eq!(result.description.as_deref(), Some("Nix Config Manager"));
        assert_eq!(result.messages.len(), 1);
        assert!(matches!(result.messages[0].role, PromptMessageRole::User));
    }
}
