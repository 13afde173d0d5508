//! Built-in fallback content for missing template sources.
//!
//! When the backing store has no entry for a template id the renderer
//! synthesizes deterministic content here instead of failing: missing
//! sources are an expected condition (a packaged binary may ship without
//! the template directory). Dispatch is keyed on the template's base file
//! name; manifest-style files get fully generated bodies, anything
//! unrecognized gets a minimal placeholder.

// Internal imports (std, crate)
use std::path::Path;

use serde_json::json;

use super::context::RenderData;
use super::registry::TemplateDefinition;

/// Synthesize content for a template id with no backing source.
///
/// `template` is the resolved definition named by `data.template`, used to
/// fill the dependency maps of a generated manifest; `None` leaves them
/// empty.
pub fn default_content(
    template_id: &str,
    data: &RenderData,
    template: Option<&TemplateDefinition>,
) -> String {
    let file_name = base_file_name(template_id);

    match file_name {
        "package.json" => generate_package_json(data, template),
        "tsconfig.json" => generate_tsconfig(),
        ".gitignore" => GITIGNORE.to_string(),
        "README.md" => generate_readme(data),
        "jest.config.js" => JEST_CONFIG.to_string(),
        ".eslintrc.js" => ESLINT_CONFIG.to_string(),
        ".prettierrc" => PRETTIER_CONFIG.to_string(),
        "Dockerfile" => DOCKERFILE.to_string(),
        "docker-compose.yml" => generate_docker_compose(data),
        _ => format!("// Generated file: {file_name}\n// Template: {template_id}\n"),
    }
}

// "src/app/config/index.ts.tera" dispatches as "index.ts".
fn base_file_name(template_id: &str) -> &str {
    let name = Path::new(template_id)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(template_id);
    name.strip_suffix(".tera").unwrap_or(name)
}

fn generate_package_json(data: &RenderData, template: Option<&TemplateDefinition>) -> String {
    let name = data.get_str("name").unwrap_or_default();
    let author = data.get_str("author").unwrap_or_default();
    let repository = data
        .get_str("repository")
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://github.com/{author}/{name}.git"));
    let dependencies = template.map(|t| t.dependencies.clone()).unwrap_or_default();
    let dev_dependencies = template
        .map(|t| t.dev_dependencies.clone())
        .unwrap_or_default();

    let manifest = json!({
        "name": name,
        "version": "1.0.0",
        "description": data.get_str("description").unwrap_or_default(),
        "main": "src/server.ts",
        "repository": {
            "type": "git",
            "url": repository,
        },
        "author": author,
        "license": data.get_str("license").unwrap_or_default(),
        "scripts": {
            "build": "npx tsc && npm run copy-keys",
            "start": "node build/server.js",
            "dev": "nodemon src/server.ts",
            "copy-keys": "cpx \"src/keys/**/*\" build/keys",
            "test": "jest",
            "test:watch": "jest --watch",
            "lint": "eslint src/**/*.ts",
            "format": "prettier --write src/**/*.ts",
        },
        "dependencies": dependencies,
        "devDependencies": dev_dependencies,
    });

    serde_json::to_string_pretty(&manifest)
        .expect("manifest is a plain JSON object and always serializes")
}

fn generate_tsconfig() -> String {
    let config = json!({
        "compilerOptions": {
            "target": "ES2020",
            "module": "commonjs",
            "lib": ["ES2020"],
            "outDir": "./build",
            "rootDir": "./src",
            "strict": true,
            "esModuleInterop": true,
            "skipLibCheck": true,
            "forceConsistentCasingInFileNames": true,
            "resolveJsonModule": true,
            "declaration": true,
            "declarationMap": true,
            "sourceMap": true,
            "removeComments": true,
            "noImplicitAny": true,
            "strictNullChecks": true,
            "strictFunctionTypes": true,
            "noImplicitThis": true,
            "noImplicitReturns": true,
            "noFallthroughCasesInSwitch": true,
            "moduleResolution": "node",
            "baseUrl": "./",
            "paths": {
                "@/*": ["src/*"],
            },
            "allowSyntheticDefaultImports": true,
            "experimentalDecorators": true,
            "emitDecoratorMetadata": true,
        },
        "include": ["src/**/*"],
        "exclude": ["node_modules", "build", "dist", "**/*.test.ts", "**/*.spec.ts"],
    });

    serde_json::to_string_pretty(&config)
        .expect("compiler config is a plain JSON object and always serializes")
}

fn generate_readme(data: &RenderData) -> String {
    let name = data.get_str("name").unwrap_or_default();
    let description = data.get_str("description").unwrap_or_default();
    let license = data.get_str("license").unwrap_or_default();
    let testing_line = if data.get_bool("testing") {
        "- Unit and integration testing\n"
    } else {
        ""
    };
    let docker_line = if data.get_bool("docker") {
        "- Docker configuration\n"
    } else {
        ""
    };
    let docker_prereq = if data.get_bool("docker") {
        "- Docker (optional)\n"
    } else {
        ""
    };

    format!(
        r#"# {name}

{description}

## Features

- Express.js with TypeScript
- MongoDB with Mongoose
- Authentication & Authorization
- Request validation
- Error handling middleware
- Logging
- CORS configuration
- Rate limiting
- Security headers
{testing_line}{docker_line}
## Quick Start

### Prerequisites

- Node.js (v16 or higher)
- MongoDB
{docker_prereq}
### Installation

```bash
# Install dependencies
npm install

# Set up environment variables
cp .env.example .env
# Edit .env with your configuration

# Start development server
npm run dev
```

### Available Scripts

- `npm run dev` - Start development server
- `npm run build` - Build for production
- `npm start` - Start production server
- `npm test` - Run tests
- `npm run lint` - Run ESLint
- `npm run format` - Format code with Prettier

## Project Structure

```
src/
├── app/
│   ├── config/          # Configuration files
│   ├── constants.ts     # Application constants
│   ├── errors/          # Custom error classes
│   ├── middlewares/     # Express middlewares
│   ├── modules/         # Feature modules
│   │   ├── auth/        # Authentication module
│   │   └── user/        # User module
│   ├── routes/          # Route definitions
│   └── shared/          # Shared utilities
├── @types/              # TypeScript type definitions
├── app.ts               # Express app configuration
└── server.ts            # Server entry point
```

## Environment Variables

Create a `.env` file in the root directory:

```env
NODE_ENV=development
PORT=5000
MONGODB_URI=mongodb://localhost:27017/your-database
JWT_SECRET=your-jwt-secret
JWT_EXPIRES_IN=7d
JWT_REFRESH_SECRET=your-refresh-secret
JWT_REFRESH_EXPIRES_IN=30d
```

## API Documentation

### Authentication Endpoints

- `POST /api/v1/auth/register` - Register a new user
- `POST /api/v1/auth/login` - Login user
- `GET /api/v1/auth/profile` - Get user profile
- `POST /api/v1/auth/refresh-token` - Refresh access token
- `PATCH /api/v1/auth/reset-password` - Reset password

## Contributing

1. Fork the repository
2. Create your feature branch (`git checkout -b feature/amazing-feature`)
3. Commit your changes (`git commit -m 'Add some amazing feature'`)
4. Push to the branch (`git push origin feature/amazing-feature`)
5. Open a Pull Request

## License

This project is licensed under the {license} License.

## Support

For support, email support@nukta.dev or create an issue in the repository.
"#
    )
}

fn generate_docker_compose(data: &RenderData) -> String {
    let name = data.get_str("name").unwrap_or_default();
    format!(
        r#"version: '3.8'

services:
  app:
    build: .
    ports:
      - "5000:5000"
    environment:
      - NODE_ENV=production
      - MONGODB_URI=mongodb://mongo:27017/{name}
    depends_on:
      - mongo
    restart: unless-stopped

  mongo:
    image: mongo:6
    ports:
      - "27017:27017"
    volumes:
      - mongodb_data:/data/db
    restart: unless-stopped

volumes:
  mongodb_data:
"#
    )
}

const GITIGNORE: &str = r#"# Dependencies
node_modules/
npm-debug.log*
yarn-debug.log*
yarn-error.log*

# Build outputs
build/
dist/
*.tsbuildinfo

# Environment variables
.env
.env.local
.env.development.local
.env.test.local
.env.production.local

# Logs
logs
*.log

# Runtime data
pids
*.pid
*.seed
*.pid.lock

# Coverage directory used by tools like istanbul
coverage/
*.lcov

# nyc test coverage
.nyc_output

# Dependency directories
jspm_packages/

# Optional npm cache directory
.npm

# Optional eslint cache
.eslintcache

# Optional REPL history
.node_repl_history

# Output of 'npm pack'
*.tgz

# Yarn Integrity file
.yarn-integrity

# dotenv environment variables file
.env.test

# parcel-bundler cache (https://parceljs.org/)
.cache
.parcel-cache

# IDE
.vscode/
.idea/
*.swp
*.swo
*~

# OS
.DS_Store
Thumbs.db

# Keys and certificates
src/keys/
*.pem
*.key
*.crt

# Docker
.dockerignore
"#;

const JEST_CONFIG: &str = r#"module.exports = {
  preset: 'ts-jest',
  testEnvironment: 'node',
  roots: ['<rootDir>/src'],
  testMatch: ['**/__tests__/**/*.ts', '**/?(*.)+(spec|test).ts'],
  transform: {
    '^.+\\.ts$': 'ts-jest',
  },
  collectCoverageFrom: [
    'src/**/*.ts',
    '!src/**/*.d.ts',
    '!src/**/*.test.ts',
    '!src/**/*.spec.ts',
  ],
  coverageDirectory: 'coverage',
  coverageReporters: ['text', 'lcov', 'html'],
  setupFilesAfterEnv: ['<rootDir>/src/__tests__/setup.ts'],
};
"#;

const ESLINT_CONFIG: &str = r#"module.exports = {
  parser: '@typescript-eslint/parser',
  extends: [
    'eslint:recommended',
    '@typescript-eslint/recommended',
  ],
  plugins: ['@typescript-eslint'],
  env: {
    node: true,
    es6: true,
  },
  parserOptions: {
    ecmaVersion: 2020,
    sourceType: 'module',
  },
  rules: {
    '@typescript-eslint/no-unused-vars': 'error',
    '@typescript-eslint/explicit-function-return-type': 'off',
    '@typescript-eslint/explicit-module-boundary-types': 'off',
    '@typescript-eslint/no-explicit-any': 'warn',
  },
};
"#;

const PRETTIER_CONFIG: &str = r#"{
  "semi": true,
  "trailingComma": "es5",
  "singleQuote": true,
  "printWidth": 80,
  "tabWidth": 2,
  "useTabs": false
}
"#;

const DOCKERFILE: &str = r#"FROM node:18-alpine

WORKDIR /app

COPY package*.json ./

RUN npm ci --only=production

COPY . .

RUN npm run build

EXPOSE 5000

CMD ["npm", "start"]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::templates::registry::TemplateRegistry;

    fn sample_data() -> RenderData {
        let mut data = RenderData::new();
        data.insert("name", "my-api");
        data.insert("description", "my-api - Express.js API");
        data.insert("author", "Nukta Solutions");
        data.insert("license", "MIT");
        data.insert("template", "full");
        data.insert("testing", false);
        data.insert("docker", false);
        data
    }

    #[test]
    fn test_package_json_uses_template_dependency_maps() {
        let registry = TemplateRegistry::builtin().unwrap();
        let full = registry.get("full").unwrap();
        let content = default_content("package.json.tera", &sample_data(), Some(full));

        let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(manifest["name"], "my-api");
        assert_eq!(manifest["version"], "1.0.0");
        assert_eq!(manifest["license"], "MIT");
        assert_eq!(manifest["dependencies"]["express"], "^4.18.2");
        assert_eq!(manifest["dependencies"]["mongoose"], "^8.2.1");
        assert_eq!(manifest["devDependencies"]["jest"], "^29.7.0");
        assert_eq!(
            manifest["repository"]["url"],
            "https://github.com/Nukta Solutions/my-api.git"
        );
    }

    #[test]
    fn test_package_json_without_template_has_empty_maps() {
        let content = default_content("package.json.tera", &sample_data(), None);
        let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(manifest["dependencies"].as_object().unwrap().is_empty());
        assert!(manifest["devDependencies"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_package_json_prefers_explicit_repository() {
        let mut data = sample_data();
        data.insert("repository", "https://github.com/acme/widgets.git");
        let content = default_content("package.json.tera", &data, None);
        let manifest: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            manifest["repository"]["url"],
            "https://github.com/acme/widgets.git"
        );
    }

    #[test]
    fn test_tsconfig_is_valid_strict_config() {
        let content = default_content("tsconfig.json.tera", &sample_data(), None);
        let config: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(config["compilerOptions"]["strict"], true);
        assert_eq!(config["compilerOptions"]["target"], "ES2020");
    }

    #[test]
    fn test_gitignore_lists_the_usual_suspects() {
        let content = default_content(".gitignore.tera", &sample_data(), None);
        assert!(content.contains("node_modules/"));
        assert!(content.contains(".env"));
        assert!(content.contains("coverage/"));
    }

    #[test]
    fn test_readme_reflects_feature_flags() {
        let mut data = sample_data();
        let plain = default_content("README.md.tera", &data, None);
        assert!(plain.starts_with("# my-api"));
        assert!(plain.contains("my-api - Express.js API"));
        assert!(plain.contains("licensed under the MIT License"));
        assert!(!plain.contains("- Docker configuration"));

        data.insert("testing", true);
        data.insert("docker", true);
        let flagged = default_content("README.md.tera", &data, None);
        assert!(flagged.contains("- Unit and integration testing"));
        assert!(flagged.contains("- Docker configuration"));
    }

    #[test]
    fn test_docker_compose_interpolates_project_name() {
        let content = default_content("docker-compose.yml.tera", &sample_data(), None);
        assert!(content.contains("MONGODB_URI=mongodb://mongo:27017/my-api"));
    }

    #[test]
    fn test_unrecognized_name_gets_minimal_placeholder() {
        let content = default_content("src/app/constants.ts.tera", &sample_data(), None);
        assert_eq!(
            content,
            "// Generated file: constants.ts\n// Template: src/app/constants.ts.tera\n"
        );
    }

    #[test]
    fn test_dispatch_strips_tera_suffix() {
        let with_suffix = default_content("Dockerfile.tera", &sample_data(), None);
        let without_suffix = default_content("Dockerfile", &sample_data(), None);
        assert_eq!(with_suffix, without_suffix);
        assert!(with_suffix.starts_with("FROM node:18-alpine"));
    }
}
